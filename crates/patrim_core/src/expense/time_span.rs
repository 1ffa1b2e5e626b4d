use serde::{Deserialize, Serialize};

use crate::error::TimeSpanError;
use crate::person::{GroupOfPersons, LifeEvent, LifeEventResolver};

/// Which member of a group sets the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupOrder {
    /// Earliest event of the group
    #[default]
    Min,
    /// Latest event of the group
    Max,
}

/// A year, fixed or tied to a life event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DateBoundary {
    Fixed {
        year: i32,
    },
    PersonEvent {
        name: String,
        event: LifeEvent,
    },
    GroupEvent {
        group: GroupOfPersons,
        event: LifeEvent,
        #[serde(default)]
        order: GroupOrder,
    },
}

impl DateBoundary {
    #[must_use]
    pub fn fixed(year: i32) -> Self {
        DateBoundary::Fixed { year }
    }

    pub fn year(&self, resolver: &dyn LifeEventResolver) -> Result<i32, TimeSpanError> {
        match self {
            DateBoundary::Fixed { year } => Ok(*year),
            DateBoundary::PersonEvent { name, event } => resolver.year_of_event(name, *event),
            DateBoundary::GroupEvent {
                group,
                event,
                order,
            } => {
                // members the event does not apply to are skipped
                let years = resolver
                    .names_in_group(*group)
                    .into_iter()
                    .filter_map(|name| resolver.year_of_event(name, *event).ok());
                let year = match order {
                    GroupOrder::Min => years.min(),
                    GroupOrder::Max => years.max(),
                };
                year.ok_or_else(|| TimeSpanError::UnresolvedEvent {
                    event: event.label(),
                    name: format!("{group:?}"),
                })
            }
        }
    }
}

/// Years during which an expense is due; ranges exclude their upper bound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimeSpan {
    Permanent,
    Starting {
        from: DateBoundary,
    },
    Ending {
        to: DateBoundary,
    },
    Spanning {
        from: DateBoundary,
        to: DateBoundary,
    },
    Periodic {
        from: DateBoundary,
        period: u32,
        to: DateBoundary,
    },
    Exceptional {
        in_year: DateBoundary,
    },
}

impl TimeSpan {
    pub fn validate(&self, resolver: &dyn LifeEventResolver) -> Result<(), TimeSpanError> {
        match self {
            TimeSpan::Permanent => Ok(()),
            TimeSpan::Starting { from } => from.year(resolver).map(|_| ()),
            TimeSpan::Ending { to } => to.year(resolver).map(|_| ()),
            TimeSpan::Exceptional { in_year } => in_year.year(resolver).map(|_| ()),
            TimeSpan::Spanning { from, to } => ordered(from, to, resolver).map(|_| ()),
            TimeSpan::Periodic { from, period, to } => {
                if *period == 0 {
                    return Err(TimeSpanError::InvalidPeriod(*period));
                }
                ordered(from, to, resolver).map(|_| ())
            }
        }
    }

    pub fn contains(
        &self,
        year: i32,
        resolver: &dyn LifeEventResolver,
    ) -> Result<bool, TimeSpanError> {
        Ok(match self {
            TimeSpan::Permanent => true,
            TimeSpan::Starting { from } => from.year(resolver)? <= year,
            TimeSpan::Ending { to } => year < to.year(resolver)?,
            TimeSpan::Exceptional { in_year } => in_year.year(resolver)? == year,
            TimeSpan::Spanning { from, to } => {
                let (from, to) = ordered(from, to, resolver)?;
                (from..to).contains(&year)
            }
            TimeSpan::Periodic { from, period, to } => {
                if *period == 0 {
                    return Err(TimeSpanError::InvalidPeriod(*period));
                }
                let (from, to) = ordered(from, to, resolver)?;
                (from..to).contains(&year) && i64::from(year - from) % i64::from(*period) == 0
            }
        })
    }
}

fn ordered(
    from: &DateBoundary,
    to: &DateBoundary,
    resolver: &dyn LifeEventResolver,
) -> Result<(i32, i32), TimeSpanError> {
    let from = from.year(resolver)?;
    let to = to.year(resolver)?;
    if from >= to {
        return Err(TimeSpanError::InvalidOrder { from, to });
    }
    Ok((from, to))
}
