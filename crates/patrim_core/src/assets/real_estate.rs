use serde::{Deserialize, Serialize};

use super::{EconomyView, Ownable};
use crate::error::ConfigError;
use crate::fiscal::FiscalModel;
use crate::ownership::Ownership;

/// Rental period `[from_year, to_year)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub from_year: i32,
    pub to_year: i32,
    pub yearly_rent: f64,
}

/// Proceeds of a sale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sale {
    pub price: f64,
    pub taxes: f64,
}

impl Sale {
    #[must_use]
    pub fn net(&self) -> f64 {
        self.price - self.taxes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealEstateAsset {
    pub name: String,
    pub ownership: Ownership,
    pub buying_year: i32,
    pub buying_price: f64,
    pub estimated_value: f64,
    /// Sold at the beginning of this year
    #[serde(default)]
    pub selling_year: Option<i32>,
    /// Defaults to the estimated value
    #[serde(default)]
    pub selling_price: Option<f64>,
    /// Main residence: exempt from capital gain taxes
    #[serde(default)]
    pub is_inhabited: bool,
    #[serde(default)]
    pub rental: Option<Rental>,
    /// Property and housing taxes
    #[serde(default)]
    pub yearly_local_taxes: f64,
}

impl RealEstateAsset {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(selling_year) = self.selling_year
            && selling_year <= self.buying_year
        {
            return Err(ConfigError::invalid(
                format!("{}.selling_year", self.name),
                "must be after the buying year",
            ));
        }
        if let Some(rental) = &self.rental
            && rental.to_year <= rental.from_year
        {
            return Err(ConfigError::invalid(
                format!("{}.rental", self.name),
                "rental must end after it starts",
            ));
        }
        if self.is_inhabited && self.rental.is_some() {
            return Err(ConfigError::invalid(
                format!("{}.rental", self.name),
                "an inhabited property cannot be rented",
            ));
        }
        Ok(())
    }

    /// Held at the end of `year`
    #[must_use]
    pub fn is_owned(&self, year: i32) -> bool {
        self.buying_year <= year && self.selling_year.is_none_or(|sold| year < sold)
    }

    /// Price paid when bought during `year`
    #[must_use]
    pub fn purchase(&self, year: i32) -> f64 {
        if year == self.buying_year {
            self.buying_price
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn rent(&self, year: i32) -> f64 {
        match &self.rental {
            Some(rental)
                if self.is_owned(year) && rental.from_year <= year && year < rental.to_year =>
            {
                rental.yearly_rent
            }
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn local_taxes(&self, year: i32) -> f64 {
        if self.is_owned(year) {
            self.yearly_local_taxes
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn sale(&self, year: i32, fiscal: &FiscalModel) -> Option<Sale> {
        if self.selling_year != Some(year) {
            return None;
        }
        let price = self.selling_price.unwrap_or(self.estimated_value);
        let holding_years = u32::try_from(year - self.buying_year).unwrap_or(0);
        Some(Sale {
            price,
            taxes: fiscal.capital_gain_taxes.taxes(
                self.buying_price,
                price,
                holding_years,
                self.is_inhabited,
            ),
        })
    }
}

impl Ownable for RealEstateAsset {
    fn name(&self) -> &str {
        &self.name
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn ownership_mut(&mut self) -> &mut Ownership {
        &mut self.ownership
    }

    fn value(&self, year: i32, _economy: &EconomyView) -> f64 {
        if self.is_owned(year) {
            self.estimated_value
        } else {
            0.0
        }
    }
}
