//! Uncertain economic, socio-economic and human-life variables

mod economic;
mod human_life;
mod socio_economy;

pub use economic::{EconomyModel, EconomyRandomVariables, Rates};
pub use human_life::{
    AdultRandomProperties, DictionaryOfAdultRandomProperties, HumanLifeModel,
    MIN_AGE_OF_DEPENDENCY,
};
pub use socio_economy::{SocioEconomyModel, SocioEconomyRandomVariables};
