//! Wallet and upgrade purchases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upgrades sold between waves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    /// Timed thrust multiplier, triggered in flight.
    Boost,
}

impl fmt::Display for Upgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upgrade::Boost => write!(f, "speed boost"),
        }
    }
}

/// Player currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    balance: u32,
}

impl Wallet {
    pub fn new(balance: u32) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn deposit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Charges `price` for `upgrade`. Nothing is charged on error.
    pub fn purchase(&mut self, upgrade: Upgrade, price: u32, owned: bool) -> Result<(), ShopError> {
        if owned {
            return Err(ShopError::AlreadyOwned(upgrade));
        }
        if self.balance < price {
            return Err(ShopError::InsufficientFunds {
                price,
                balance: self.balance,
            });
        }
        self.balance -= price;
        Ok(())
    }
}

/// Shop operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    InsufficientFunds { price: u32, balance: u32 },
    AlreadyOwned(Upgrade),
}

impl fmt::Display for ShopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopError::InsufficientFunds { price, balance } => {
                write!(f, "not enough money: costs {price}$, have {balance}$")
            }
            ShopError::AlreadyOwned(upgrade) => write!(f, "{upgrade} already owned"),
        }
    }
}

impl std::error::Error for ShopError {}
