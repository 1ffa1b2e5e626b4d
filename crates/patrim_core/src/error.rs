use std::fmt;

/// Errors raised by the random models (economy, socio-economy, human life)
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Per-year samples requested over an empty range
    OutOfBounds { first_year: i32, last_year: i32 },
    /// Rates requested for a year with no pre-generated sample
    YearNotGenerated(i32),
    /// Last year of the horizon does not fit in a year number
    HorizonOverflow { first_year: i32, nb_years: u32 },
    InvalidDistribution {
        generator: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::OutOfBounds {
                first_year,
                last_year,
            } => write!(
                f,
                "cannot generate samples: last year {last_year} is before first year {first_year}"
            ),
            ModelError::HorizonOverflow {
                first_year,
                nb_years,
            } => write!(f, "a horizon of {nb_years} years from {first_year} overflows"),
            ModelError::YearNotGenerated(year) => {
                write!(f, "no rate sample was generated for year {year}")
            }
            ModelError::InvalidDistribution { generator, reason } => {
                write!(f, "invalid {generator} parameters: {reason}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// Errors raised by the fiscal functions
#[derive(Debug, Clone, PartialEq)]
pub enum FiscalError {
    /// A tax base handed to a bracket table was negative
    NegativeBase { base: f64 },
    /// The household quotient needs at least one adult
    NoAdult,
}

impl fmt::Display for FiscalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiscalError::NegativeBase { base } => write!(f, "negative tax base {base}"),
            FiscalError::NoAdult => write!(f, "family quotient requires at least one adult"),
        }
    }
}

impl std::error::Error for FiscalError {}

/// Errors related to expense time spans
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSpanError {
    InvalidOrder { from: i32, to: i32 },
    InvalidPeriod(u32),
    UnknownPerson(String),
    /// The life event cannot be resolved for this person (e.g. a child retiring)
    UnresolvedEvent { event: &'static str, name: String },
}

impl fmt::Display for TimeSpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSpanError::InvalidOrder { from, to } => {
                write!(f, "time span starts in {from} but does not end before {to}")
            }
            TimeSpanError::InvalidPeriod(period) => {
                write!(f, "periodic time span needs a period > 0 (got {period})")
            }
            TimeSpanError::UnknownPerson(name) => {
                write!(f, "time span refers to unknown person '{name}'")
            }
            TimeSpanError::UnresolvedEvent { event, name } => {
                write!(f, "life event '{event}' does not apply to '{name}'")
            }
        }
    }
}

impl std::error::Error for TimeSpanError {}

/// Errors related to ownership records
#[derive(Debug, Clone, PartialEq)]
pub enum OwnershipError {
    /// Fractions of one kind of ownership do not sum to 100 %
    InvalidFractions { kind: &'static str, sum: f64 },
    EmptyOwners(&'static str),
    NegativeFraction { name: String, fraction: f64 },
}

impl fmt::Display for OwnershipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnershipError::InvalidFractions { kind, sum } => {
                write!(f, "{kind} fractions sum to {sum} % instead of 100 %")
            }
            OwnershipError::EmptyOwners(kind) => write!(f, "no {kind} owner"),
            OwnershipError::NegativeFraction { name, fraction } => {
                write!(f, "negative fraction {fraction} % for owner '{name}'")
            }
        }
    }
}

impl std::error::Error for OwnershipError {}

/// Errors found while loading a model configuration or validating a scenario
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidParameter {
        parameter: String,
        reason: String,
    },
    UnknownPerson {
        context: String,
        name: String,
    },
    DuplicatePerson(String),
    Model(ModelError),
    Ownership {
        item: String,
        source: OwnershipError,
    },
    TimeSpan {
        expense: String,
        source: TimeSpanError,
    },
}

impl ConfigError {
    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter { parameter, reason } => {
                write!(f, "invalid parameter '{parameter}': {reason}")
            }
            ConfigError::UnknownPerson { context, name } => {
                write!(f, "{context} refers to unknown person '{name}'")
            }
            ConfigError::DuplicatePerson(name) => {
                write!(f, "a family member named '{name}' already exists")
            }
            ConfigError::Model(e) => write!(f, "{e}"),
            ConfigError::Ownership { item, source } => {
                write!(f, "ownership of '{item}': {source}")
            }
            ConfigError::TimeSpan { expense, source } => {
                write!(f, "time span of expense '{expense}': {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Model(e) => Some(e),
            ConfigError::Ownership { source, .. } => Some(source),
            ConfigError::TimeSpan { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ModelError> for ConfigError {
    fn from(e: ModelError) -> Self {
        ConfigError::Model(e)
    }
}

/// Errors aborting a simulation run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    Model(ModelError),
    Fiscal(FiscalError),
    TimeSpan(TimeSpanError),
    Ownership(OwnershipError),
    /// A yearly step failed; carries the year being computed
    InYear {
        year: i32,
        source: Box<SimulationError>,
    },
    /// Operation not allowed in the current simulation status
    InvalidStatus(&'static str),
    /// Monte Carlo batch was cancelled by user request
    Cancelled,
}

impl SimulationError {
    pub fn in_year(self, year: i32) -> Self {
        match self {
            SimulationError::InYear { .. } => self,
            other => SimulationError::InYear {
                year,
                source: Box::new(other),
            },
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "configuration error: {e}"),
            SimulationError::Model(e) => write!(f, "{e}"),
            SimulationError::Fiscal(e) => write!(f, "{e}"),
            SimulationError::TimeSpan(e) => write!(f, "{e}"),
            SimulationError::Ownership(e) => write!(f, "{e}"),
            SimulationError::InYear { year, source } => write!(f, "year {year}: {source}"),
            SimulationError::InvalidStatus(msg) => write!(f, "invalid simulation status: {msg}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Model(e) => Some(e),
            SimulationError::Fiscal(e) => Some(e),
            SimulationError::TimeSpan(e) => Some(e),
            SimulationError::Ownership(e) => Some(e),
            SimulationError::InYear { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<ModelError> for SimulationError {
    fn from(e: ModelError) -> Self {
        SimulationError::Model(e)
    }
}

impl From<FiscalError> for SimulationError {
    fn from(e: FiscalError) -> Self {
        SimulationError::Fiscal(e)
    }
}

impl From<TimeSpanError> for SimulationError {
    fn from(e: TimeSpanError) -> Self {
        SimulationError::TimeSpan(e)
    }
}

impl From<OwnershipError> for SimulationError {
    fn from(e: OwnershipError) -> Self {
        SimulationError::Ownership(e)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
