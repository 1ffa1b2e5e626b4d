//! Beneficiary clause of a life-insurance contract

use serde::{Deserialize, Serialize};

use super::ownership::{Owner, ShareKind, ShareTransfer};
use crate::error::OwnershipError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClauseRecipients {
    /// Capital paid in full ownership, fractions in percent
    Full { recipients: Vec<Owner> },
    /// Capital paid in quasi-usufruct to one recipient, bare ownership shared equally
    Dismembered {
        usufruct_recipient: String,
        bare_recipients: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeInsuranceClause {
    /// The spouse may choose between full and dismembered payment
    #[serde(default)]
    pub is_optional: bool,
    pub recipients: ClauseRecipients,
}

impl LifeInsuranceClause {
    pub fn full(recipients: Vec<Owner>) -> Self {
        Self {
            is_optional: false,
            recipients: ClauseRecipients::Full { recipients },
        }
    }

    pub fn dismembered(usufruct_recipient: impl Into<String>, bare_recipients: Vec<String>) -> Self {
        Self {
            is_optional: false,
            recipients: ClauseRecipients::Dismembered {
                usufruct_recipient: usufruct_recipient.into(),
                bare_recipients,
            },
        }
    }

    pub fn validate(&self) -> Result<(), OwnershipError> {
        match &self.recipients {
            ClauseRecipients::Full { recipients } => {
                if recipients.is_empty() {
                    return Err(OwnershipError::EmptyOwners("clause"));
                }
                let sum: f64 = recipients.iter().map(|r| r.fraction).sum();
                if (sum - 100.0).abs() > 0.01 {
                    return Err(OwnershipError::InvalidFractions {
                        kind: "clause",
                        sum,
                    });
                }
                Ok(())
            }
            ClauseRecipients::Dismembered {
                bare_recipients, ..
            } => {
                if bare_recipients.is_empty() {
                    return Err(OwnershipError::EmptyOwners("clause bare"));
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_dismembered(&self) -> bool {
        matches!(self.recipients, ClauseRecipients::Dismembered { .. })
    }

    #[must_use]
    pub fn has_recipient(&self, name: &str) -> bool {
        match &self.recipients {
            ClauseRecipients::Full { recipients } => recipients.iter().any(|r| r.name == name),
            ClauseRecipients::Dismembered {
                usufruct_recipient,
                bare_recipients,
            } => usufruct_recipient == name || bare_recipients.iter().any(|r| r == name),
        }
    }

    /// Full-ownership fraction promised to `name`, in percent
    #[must_use]
    pub fn full_fraction(&self, name: &str) -> f64 {
        match &self.recipients {
            ClauseRecipients::Full { recipients } => recipients
                .iter()
                .filter(|r| r.name == name)
                .map(|r| r.fraction)
                .sum(),
            ClauseRecipients::Dismembered { .. } => 0.0,
        }
    }

    /// Rights of each recipient, in percent of the capital
    #[must_use]
    pub fn recipient_shares(&self) -> Vec<ShareTransfer> {
        match &self.recipients {
            ClauseRecipients::Full { recipients } => recipients
                .iter()
                .map(|r| ShareTransfer {
                    to: r.name.clone(),
                    kind: ShareKind::Full,
                    fraction: r.fraction,
                })
                .collect(),
            ClauseRecipients::Dismembered {
                usufruct_recipient,
                bare_recipients,
            } => {
                let mut shares = vec![ShareTransfer {
                    to: usufruct_recipient.clone(),
                    kind: ShareKind::Usufruct,
                    fraction: 100.0,
                }];
                let each = 100.0 / bare_recipients.len().max(1) as f64;
                shares.extend(bare_recipients.iter().map(|name| ShareTransfer {
                    to: name.clone(),
                    kind: ShareKind::Bare {
                        usufructuaries: vec![Owner::new(usufruct_recipient.clone(), 100.0)],
                    },
                    fraction: each,
                }));
                shares
            }
        }
    }

    /// Update the clause after the death of one of its recipients.
    ///
    /// Returns whether the clause changed. A sole recipient without children
    /// leaves the clause unchanged.
    pub fn manage_recipient_death(&mut self, decedent: &str, children: &[String]) -> bool {
        if !self.has_recipient(decedent) {
            return false;
        }
        let equal_shares = |names: &[String]| -> Vec<Owner> {
            let each = 100.0 / names.len() as f64;
            names.iter().map(|n| Owner::new(n.clone(), each)).collect()
        };
        let next = match &self.recipients {
            ClauseRecipients::Full { recipients } => {
                let share: f64 = recipients
                    .iter()
                    .filter(|r| r.name == decedent)
                    .map(|r| r.fraction)
                    .sum();
                let others: Vec<Owner> = recipients
                    .iter()
                    .filter(|r| r.name != decedent)
                    .cloned()
                    .collect();
                let others_total: f64 = others.iter().map(|r| r.fraction).sum();
                if others_total > 0.0 {
                    ClauseRecipients::Full {
                        recipients: others
                            .into_iter()
                            .map(|r| {
                                let fraction = r.fraction + share * r.fraction / others_total;
                                Owner::new(r.name, fraction)
                            })
                            .collect(),
                    }
                } else if !children.is_empty() {
                    ClauseRecipients::Full {
                        recipients: equal_shares(children),
                    }
                } else {
                    return false;
                }
            }
            ClauseRecipients::Dismembered {
                usufruct_recipient,
                bare_recipients,
            } => {
                if usufruct_recipient == decedent {
                    ClauseRecipients::Full {
                        recipients: equal_shares(bare_recipients.as_slice()),
                    }
                } else {
                    let remaining: Vec<String> = bare_recipients
                        .iter()
                        .filter(|r| *r != decedent)
                        .cloned()
                        .collect();
                    if !remaining.is_empty() {
                        ClauseRecipients::Dismembered {
                            usufruct_recipient: usufruct_recipient.clone(),
                            bare_recipients: remaining,
                        }
                    } else if !children.is_empty() {
                        ClauseRecipients::Dismembered {
                            usufruct_recipient: usufruct_recipient.clone(),
                            bare_recipients: children.to_vec(),
                        }
                    } else {
                        ClauseRecipients::Full {
                            recipients: vec![Owner::new(usufruct_recipient.clone(), 100.0)],
                        }
                    }
                }
            }
        };
        self.recipients = next;
        true
    }

    /// Move up to `fraction` percent from `from` to `to` in a full clause.
    ///
    /// Returns the fraction actually moved.
    pub fn move_share(&mut self, from: &str, to: &str, fraction: f64) -> f64 {
        let ClauseRecipients::Full { recipients } = &mut self.recipients else {
            return 0.0;
        };
        let Some(giver) = recipients.iter_mut().find(|r| r.name == from) else {
            return 0.0;
        };
        let moved = fraction.clamp(0.0, giver.fraction);
        if moved <= 0.0 {
            return 0.0;
        }
        giver.fraction -= moved;
        match recipients.iter_mut().find(|r| r.name == to) {
            Some(taker) => taker.fraction += moved,
            None => recipients.push(Owner::new(to, moved)),
        }
        recipients.retain(|r| r.fraction > 0.0);
        moved
    }
}
