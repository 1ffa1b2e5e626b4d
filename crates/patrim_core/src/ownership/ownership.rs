use serde::{Deserialize, Serialize};

use crate::error::OwnershipError;
use crate::fiscal::Demembrement;
use crate::person::AgeProvider;

/// Tolerance on fraction sums, in percent
const TOLERANCE: f64 = 0.01;

/// One owner and its share, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub fraction: f64,
}

impl Owner {
    pub fn new(name: impl Into<String>, fraction: f64) -> Self {
        Self {
            name: name.into(),
            fraction,
        }
    }
}

/// Choice of the surviving spouse in a legal succession with children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InheritanceFiscalOption {
    /// Usufruct of the whole share; children share the bare ownership
    #[default]
    FullUsufruct,
    /// Full ownership of the available quota (1/2, 1/3 or 1/4)
    QuotiteDisponible,
    /// 1/4 in full ownership and 3/4 in usufruct
    UsufructPlusBare,
}

impl InheritanceFiscalOption {
    /// Available quota for the spouse given the number of children
    #[must_use]
    pub fn quotite_disponible(nb_children: usize) -> f64 {
        match nb_children {
            0 => 1.0,
            1 => 0.5,
            2 => 1.0 / 3.0,
            _ => 0.25,
        }
    }
}

/// How a share of an asset is valued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMethod {
    /// Net worth: usufruct and bare ownership valued by the fiscal scale
    Patrimoine,
    /// Estate of a decedent: usufruct extinguishes and is worth nothing
    LegalSuccession,
    /// Capital paid by a life-insurance contract: full ownership only
    LifeInsuranceSuccession,
}

/// Kind of right received by an heir
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShareKind {
    Full,
    Usufruct,
    /// Bare ownership encumbered by the usufruct of `usufructuaries`
    Bare { usufructuaries: Vec<Owner> },
}

/// Share received by an heir, in percent of the asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareTransfer {
    pub to: String,
    pub kind: ShareKind,
    pub fraction: f64,
}

/// What valuation of dismembered shares depends on
#[derive(Clone, Copy)]
pub struct ValuationContext<'a> {
    pub year: i32,
    pub ages: &'a dyn AgeProvider,
    pub demembrement: &'a Demembrement,
}

impl ValuationContext<'_> {
    fn usufruct_ratio(&self, name: &str) -> f64 {
        let age = self.ages.age_of(name, self.year).unwrap_or(0);
        self.demembrement.usufruct_ratio(age)
    }

    /// Share of the value held in usufruct by `usufructuaries`
    fn encumbrance(&self, usufructuaries: &[Owner]) -> f64 {
        usufructuaries
            .iter()
            .map(|o| o.fraction / 100.0 * self.usufruct_ratio(&o.name))
            .sum()
    }
}

impl ShareTransfer {
    #[must_use]
    pub fn value(&self, total_value: f64, ctx: &ValuationContext<'_>) -> f64 {
        let share = self.fraction / 100.0 * total_value;
        match &self.kind {
            ShareKind::Full => share,
            ShareKind::Usufruct => share * ctx.usufruct_ratio(&self.to),
            ShareKind::Bare { usufructuaries } => share * (1.0 - ctx.encumbrance(usufructuaries)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Ownership {
    Undismembered {
        full_owners: Vec<Owner>,
    },
    Dismembered {
        usufruct_owners: Vec<Owner>,
        bare_owners: Vec<Owner>,
    },
}

// ============================================================================
// Owner list helpers
// ============================================================================

fn total(owners: &[Owner]) -> f64 {
    owners.iter().map(|o| o.fraction).sum()
}

fn fraction_of(owners: &[Owner], name: &str) -> f64 {
    owners
        .iter()
        .filter(|o| o.name == name)
        .map(|o| o.fraction)
        .sum()
}

fn without(owners: &[Owner], name: &str) -> Vec<Owner> {
    owners.iter().filter(|o| o.name != name).cloned().collect()
}

fn add_share(owners: &mut Vec<Owner>, name: &str, fraction: f64) {
    match owners.iter_mut().find(|o| o.name == name) {
        Some(owner) => owner.fraction += fraction,
        None => owners.push(Owner::new(name, fraction)),
    }
}

/// Split `amount` between `owners` in proportion to their fractions
fn pro_rata(owners: &[Owner], amount: f64) -> Vec<Owner> {
    let sum = total(owners);
    if sum <= 0.0 {
        return Vec::new();
    }
    owners
        .iter()
        .map(|o| Owner::new(o.name.clone(), amount * o.fraction / sum))
        .collect()
}

fn validate_list(owners: &[Owner], kind: &'static str) -> Result<(), OwnershipError> {
    if owners.is_empty() {
        return Err(OwnershipError::EmptyOwners(kind));
    }
    if let Some(owner) = owners.iter().find(|o| o.fraction < 0.0) {
        return Err(OwnershipError::NegativeFraction {
            name: owner.name.clone(),
            fraction: owner.fraction,
        });
    }
    let sum = total(owners);
    if (sum - 100.0).abs() > TOLERANCE {
        return Err(OwnershipError::InvalidFractions { kind, sum });
    }
    Ok(())
}

fn same_owners(a: &[Owner], b: &[Owner]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|o| (fraction_of(b, &o.name) - o.fraction).abs() <= TOLERANCE)
}

/// Shares granted by law to the heirs of a full-ownership `share`
fn legal_grants(
    share: f64,
    children: &[String],
    spouse: Option<&str>,
    option: InheritanceFiscalOption,
) -> Vec<ShareTransfer> {
    let full = |to: &str, fraction: f64| ShareTransfer {
        to: to.to_string(),
        kind: ShareKind::Full,
        fraction,
    };
    let nb_children = children.len();
    match spouse {
        None if nb_children == 0 => Vec::new(),
        Some(spouse) if nb_children == 0 => vec![full(spouse, share)],
        None => children
            .iter()
            .map(|child| full(child, share / nb_children as f64))
            .collect(),
        Some(spouse) => {
            let encumbered_by_spouse = || ShareKind::Bare {
                usufructuaries: vec![Owner::new(spouse, 100.0)],
            };
            let (mut grants, children_part, children_kind) = match option {
                InheritanceFiscalOption::QuotiteDisponible => {
                    let quota = InheritanceFiscalOption::quotite_disponible(nb_children);
                    (
                        vec![full(spouse, share * quota)],
                        share * (1.0 - quota),
                        ShareKind::Full,
                    )
                }
                InheritanceFiscalOption::FullUsufruct => (
                    vec![ShareTransfer {
                        to: spouse.to_string(),
                        kind: ShareKind::Usufruct,
                        fraction: share,
                    }],
                    share,
                    encumbered_by_spouse(),
                ),
                InheritanceFiscalOption::UsufructPlusBare => (
                    vec![
                        full(spouse, share / 4.0),
                        ShareTransfer {
                            to: spouse.to_string(),
                            kind: ShareKind::Usufruct,
                            fraction: share * 3.0 / 4.0,
                        },
                    ],
                    share * 3.0 / 4.0,
                    encumbered_by_spouse(),
                ),
            };
            grants.extend(children.iter().map(|child| ShareTransfer {
                to: child.clone(),
                kind: children_kind.clone(),
                fraction: children_part / nb_children as f64,
            }));
            grants
        }
    }
}

impl Ownership {
    /// Single full owner
    pub fn full(name: impl Into<String>) -> Self {
        Ownership::Undismembered {
            full_owners: vec![Owner::new(name, 100.0)],
        }
    }

    pub fn validate(&self) -> Result<(), OwnershipError> {
        match self {
            Ownership::Undismembered { full_owners } => validate_list(full_owners, "full"),
            Ownership::Dismembered {
                usufruct_owners,
                bare_owners,
            } => {
                validate_list(usufruct_owners, "usufruct")?;
                validate_list(bare_owners, "bare")
            }
        }
    }

    #[must_use]
    pub fn is_dismembered(&self) -> bool {
        matches!(self, Ownership::Dismembered { .. })
    }

    /// Distinct owner names, any kind of right
    #[must_use]
    pub fn owner_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let lists: [&[Owner]; 2] = match self {
            Ownership::Undismembered { full_owners } => [full_owners.as_slice(), &[]],
            Ownership::Dismembered {
                usufruct_owners,
                bare_owners,
            } => [usufruct_owners.as_slice(), bare_owners.as_slice()],
        };
        for owner in lists.into_iter().flatten() {
            if !names.contains(&owner.name.as_str()) {
                names.push(owner.name.as_str());
            }
        }
        names
    }

    #[must_use]
    pub fn has_an_owner_named(&self, name: &str) -> bool {
        self.owner_names().contains(&name)
    }

    /// Full-ownership fraction held by `name`, in percent
    #[must_use]
    pub fn full_fraction(&self, name: &str) -> f64 {
        match self {
            Ownership::Undismembered { full_owners } => fraction_of(full_owners, name),
            Ownership::Dismembered { .. } => 0.0,
        }
    }

    #[must_use]
    pub fn is_full_owner(&self, name: &str) -> bool {
        self.full_fraction(name) > 0.0
    }

    #[must_use]
    pub fn is_usufruct_owner(&self, name: &str) -> bool {
        match self {
            Ownership::Dismembered {
                usufruct_owners, ..
            } => fraction_of(usufruct_owners, name) > 0.0,
            Ownership::Undismembered { .. } => false,
        }
    }

    #[must_use]
    pub fn is_bare_owner(&self, name: &str) -> bool {
        match self {
            Ownership::Dismembered { bare_owners, .. } => fraction_of(bare_owners, name) > 0.0,
            Ownership::Undismembered { .. } => false,
        }
    }

    /// Value of the rights held by `name` on an asset worth `total_value`
    #[must_use]
    pub fn owned_value(
        &self,
        name: &str,
        total_value: f64,
        method: EvaluationMethod,
        ctx: &ValuationContext<'_>,
    ) -> f64 {
        match self {
            Ownership::Undismembered { full_owners } => {
                fraction_of(full_owners, name) / 100.0 * total_value
            }
            Ownership::Dismembered {
                usufruct_owners,
                bare_owners,
            } => {
                let bare = fraction_of(bare_owners, name) / 100.0
                    * (1.0 - ctx.encumbrance(usufruct_owners))
                    * total_value;
                match method {
                    EvaluationMethod::Patrimoine => {
                        let usufruct = fraction_of(usufruct_owners, name) / 100.0
                            * ctx.usufruct_ratio(name)
                            * total_value;
                        usufruct + bare
                    }
                    EvaluationMethod::LegalSuccession => bare,
                    EvaluationMethod::LifeInsuranceSuccession => 0.0,
                }
            }
        }
    }

    /// Replace the full-ownership share of `decedent` by `grants`, whose
    /// fractions are expressed in percent of that share
    pub fn grant_full_share(
        &mut self,
        decedent: &str,
        grants: &[ShareTransfer],
    ) -> Result<Vec<ShareTransfer>, OwnershipError> {
        let Ownership::Undismembered { full_owners } = self else {
            return Ok(Vec::new());
        };
        let share = fraction_of(full_owners, decedent);
        if share <= 0.0 || grants.is_empty() {
            return Ok(Vec::new());
        }
        let scaled: Vec<ShareTransfer> = grants
            .iter()
            .map(|g| ShareTransfer {
                fraction: g.fraction * share / 100.0,
                ..g.clone()
            })
            .collect();
        let next = Self::with_grants(without(full_owners, decedent), &scaled);
        next.validate()?;
        *self = next;
        Ok(scaled)
    }

    /// Redistribute the rights of `decedent` to its heirs.
    ///
    /// Returns the shares received, used to value the inheritance. The record
    /// is left untouched when the result would be invalid.
    pub fn transfer_ownership_of(
        &mut self,
        decedent: &str,
        children: &[String],
        spouse: Option<&str>,
        option: InheritanceFiscalOption,
    ) -> Result<Vec<ShareTransfer>, OwnershipError> {
        let (next, transfers) = match self {
            Ownership::Undismembered { full_owners } => {
                let share = fraction_of(full_owners, decedent);
                if share <= 0.0 {
                    return Ok(Vec::new());
                }
                let grants = legal_grants(share, children, spouse, option);
                if grants.is_empty() {
                    return Ok(Vec::new());
                }
                (Self::with_grants(without(full_owners, decedent), &grants), grants)
            }
            Ownership::Dismembered {
                usufruct_owners,
                bare_owners,
            } => {
                let usufruct_share = fraction_of(usufruct_owners, decedent);
                let bare_share = fraction_of(bare_owners, decedent);
                if usufruct_share <= 0.0 && bare_share <= 0.0 {
                    return Ok(Vec::new());
                }
                let mut usufruct = usufruct_owners.clone();
                let mut bare = bare_owners.clone();
                let mut transfers = Vec::new();

                if bare_share > 0.0 {
                    let others = without(&bare, decedent);
                    // sole bare owner: the usufructuaries get the bare ownership
                    let receivers = if total(&others) > 0.0 {
                        others
                    } else {
                        without(&usufruct, decedent)
                    };
                    if receivers.is_empty() {
                        // holds both rights alone: same as a full owner
                        let mut as_full = Ownership::full(decedent);
                        let transfers =
                            as_full.transfer_ownership_of(decedent, children, spouse, option)?;
                        if transfers.is_empty() {
                            return Ok(transfers);
                        }
                        *self = as_full;
                        return Ok(transfers);
                    }
                    bare = without(&bare, decedent);
                    for heir in pro_rata(&receivers, bare_share) {
                        add_share(&mut bare, &heir.name, heir.fraction);
                        transfers.push(ShareTransfer {
                            to: heir.name,
                            kind: ShareKind::Bare {
                                usufructuaries: usufruct_owners.clone(),
                            },
                            fraction: heir.fraction,
                        });
                    }
                }

                let next = if usufruct_share > 0.0 {
                    let others = without(&usufruct, decedent);
                    if others.is_empty() {
                        // usufruct extinguished
                        Ownership::Undismembered { full_owners: bare }
                    } else {
                        usufruct = others.clone();
                        for heir in pro_rata(&others, usufruct_share) {
                            add_share(&mut usufruct, &heir.name, heir.fraction);
                        }
                        Ownership::Dismembered {
                            usufruct_owners: usufruct,
                            bare_owners: bare,
                        }
                    }
                } else {
                    Ownership::Dismembered {
                        usufruct_owners: usufruct,
                        bare_owners: bare,
                    }
                };
                (next, transfers)
            }
        };

        let next = next.normalized();
        next.validate()?;
        *self = next;
        Ok(transfers)
    }

    /// Remaining full owners completed with `grants`
    fn with_grants(mut remaining: Vec<Owner>, grants: &[ShareTransfer]) -> Ownership {
        if grants.iter().all(|g| g.kind == ShareKind::Full) {
            for grant in grants {
                add_share(&mut remaining, &grant.to, grant.fraction);
            }
            return Ownership::Undismembered {
                full_owners: remaining,
            };
        }
        // a full owner holds both the usufruct and the bare ownership
        let mut usufruct = remaining.clone();
        let mut bare = remaining;
        for grant in grants {
            match grant.kind {
                ShareKind::Full => {
                    add_share(&mut usufruct, &grant.to, grant.fraction);
                    add_share(&mut bare, &grant.to, grant.fraction);
                }
                ShareKind::Usufruct => add_share(&mut usufruct, &grant.to, grant.fraction),
                ShareKind::Bare { .. } => add_share(&mut bare, &grant.to, grant.fraction),
            }
        }
        Ownership::Dismembered {
            usufruct_owners: usufruct,
            bare_owners: bare,
        }
        .normalized()
    }

    /// Drop empty shares and collapse a dismemberment held by the same owners
    fn normalized(self) -> Ownership {
        match self {
            Ownership::Undismembered { full_owners } => Ownership::Undismembered {
                full_owners: full_owners
                    .into_iter()
                    .filter(|o| o.fraction > 0.0)
                    .collect(),
            },
            Ownership::Dismembered {
                usufruct_owners,
                bare_owners,
            } => {
                let usufruct: Vec<Owner> = usufruct_owners
                    .into_iter()
                    .filter(|o| o.fraction > 0.0)
                    .collect();
                let bare: Vec<Owner> = bare_owners
                    .into_iter()
                    .filter(|o| o.fraction > 0.0)
                    .collect();
                if same_owners(&usufruct, &bare) {
                    Ownership::Undismembered { full_owners: bare }
                } else {
                    Ownership::Dismembered {
                        usufruct_owners: usufruct,
                        bare_owners: bare,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ages(Vec<(&'static str, i32)>);

    impl AgeProvider for Ages {
        fn age_of(&self, name: &str, _year: i32) -> Option<i32> {
            self.0.iter().find(|(n, _)| *n == name).map(|(_, a)| *a)
        }
    }

    fn children() -> Vec<String> {
        vec!["Arthur".to_string(), "Lou".to_string()]
    }

    fn check_invariant(ownership: &Ownership) {
        ownership.validate().unwrap();
    }

    #[test]
    fn test_validate() {
        assert!(Ownership::full("A").validate().is_ok());
        let bad = Ownership::Undismembered {
            full_owners: vec![Owner::new("A", 60.0), Owner::new("B", 30.0)],
        };
        assert_eq!(
            bad.validate(),
            Err(OwnershipError::InvalidFractions {
                kind: "full",
                sum: 90.0
            })
        );
        let empty = Ownership::Dismembered {
            usufruct_owners: vec![],
            bare_owners: vec![Owner::new("A", 100.0)],
        };
        assert_eq!(empty.validate(), Err(OwnershipError::EmptyOwners("usufruct")));
    }

    #[test]
    fn test_no_spouse_children_split_equally() {
        let mut o = Ownership::full("Lionel");
        let transfers = o
            .transfer_ownership_of("Lionel", &children(), None, InheritanceFiscalOption::FullUsufruct)
            .unwrap();
        check_invariant(&o);
        assert_eq!(transfers.len(), 2);
        assert_eq!(o.full_fraction("Arthur"), 50.0);
        assert!(!o.has_an_owner_named("Lionel"));
    }

    #[test]
    fn test_spouse_without_children_absorbs_share() {
        let mut o = Ownership::Undismembered {
            full_owners: vec![Owner::new("Lionel", 50.0), Owner::new("Vanessa", 50.0)],
        };
        o.transfer_ownership_of("Lionel", &[], Some("Vanessa"), InheritanceFiscalOption::FullUsufruct)
            .unwrap();
        assert_eq!(o, Ownership::full("Vanessa"));
    }

    #[test]
    fn test_full_usufruct_option() {
        let mut o = Ownership::full("Lionel");
        o.transfer_ownership_of(
            "Lionel",
            &children(),
            Some("Vanessa"),
            InheritanceFiscalOption::FullUsufruct,
        )
        .unwrap();
        check_invariant(&o);
        assert!(o.is_usufruct_owner("Vanessa"));
        assert!(o.is_bare_owner("Arthur"));
        assert!(o.is_bare_owner("Lou"));
        assert!(!o.is_bare_owner("Vanessa"));
    }

    #[test]
    fn test_common_property_with_full_usufruct_option() {
        let mut o = Ownership::Undismembered {
            full_owners: vec![Owner::new("Lionel", 50.0), Owner::new("Vanessa", 50.0)],
        };
        o.transfer_ownership_of(
            "Lionel",
            &children(),
            Some("Vanessa"),
            InheritanceFiscalOption::FullUsufruct,
        )
        .unwrap();
        check_invariant(&o);
        let Ownership::Dismembered {
            usufruct_owners,
            bare_owners,
        } = &o
        else {
            panic!("expected a dismembered ownership");
        };
        assert_eq!(usufruct_owners, &vec![Owner::new("Vanessa", 100.0)]);
        assert_eq!(fraction_of(bare_owners, "Vanessa"), 50.0);
        assert_eq!(fraction_of(bare_owners, "Arthur"), 25.0);
    }

    #[test]
    fn test_quotite_disponible_option() {
        let mut o = Ownership::full("Lionel");
        o.transfer_ownership_of(
            "Lionel",
            &children(),
            Some("Vanessa"),
            InheritanceFiscalOption::QuotiteDisponible,
        )
        .unwrap();
        check_invariant(&o);
        assert!((o.full_fraction("Vanessa") - 100.0 / 3.0).abs() < 1e-9);
        assert!((o.full_fraction("Arthur") - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_usufruct_plus_bare_option() {
        let mut o = Ownership::full("Lionel");
        o.transfer_ownership_of(
            "Lionel",
            &children(),
            Some("Vanessa"),
            InheritanceFiscalOption::UsufructPlusBare,
        )
        .unwrap();
        check_invariant(&o);
        let Ownership::Dismembered {
            usufruct_owners,
            bare_owners,
        } = &o
        else {
            panic!("expected a dismembered ownership");
        };
        assert_eq!(fraction_of(usufruct_owners, "Vanessa"), 100.0);
        assert_eq!(fraction_of(bare_owners, "Vanessa"), 25.0);
        assert_eq!(fraction_of(bare_owners, "Lou"), 37.5);
    }

    #[test]
    fn test_usufructuary_death_collapses_to_bare_owners() {
        let mut o = Ownership::Dismembered {
            usufruct_owners: vec![Owner::new("Vanessa", 100.0)],
            bare_owners: vec![Owner::new("Arthur", 60.0), Owner::new("Lou", 40.0)],
        };
        let transfers = o
            .transfer_ownership_of("Vanessa", &children(), None, InheritanceFiscalOption::FullUsufruct)
            .unwrap();
        assert!(transfers.is_empty());
        assert_eq!(
            o,
            Ownership::Undismembered {
                full_owners: vec![Owner::new("Arthur", 60.0), Owner::new("Lou", 40.0)]
            }
        );
    }

    #[test]
    fn test_bare_owner_death_redistributes_pro_rata() {
        let mut o = Ownership::Dismembered {
            usufruct_owners: vec![Owner::new("Vanessa", 100.0)],
            bare_owners: vec![
                Owner::new("Arthur", 50.0),
                Owner::new("Lou", 25.0),
                Owner::new("Paul", 25.0),
            ],
        };
        let transfers = o
            .transfer_ownership_of("Arthur", &[], None, InheritanceFiscalOption::FullUsufruct)
            .unwrap();
        check_invariant(&o);
        assert_eq!(transfers.len(), 2);
        assert!(o.is_usufruct_owner("Vanessa"));
        let Ownership::Dismembered { bare_owners, .. } = &o else {
            panic!("expected a dismembered ownership");
        };
        assert_eq!(fraction_of(bare_owners, "Lou"), 50.0);
        assert_eq!(fraction_of(bare_owners, "Paul"), 50.0);
    }

    #[test]
    fn test_sole_bare_owner_death_gives_full_ownership_to_usufructuary() {
        let mut o = Ownership::Dismembered {
            usufruct_owners: vec![Owner::new("Vanessa", 100.0)],
            bare_owners: vec![Owner::new("Arthur", 100.0)],
        };
        o.transfer_ownership_of("Arthur", &[], None, InheritanceFiscalOption::FullUsufruct)
            .unwrap();
        assert_eq!(o, Ownership::full("Vanessa"));
    }

    #[test]
    fn test_no_heir_leaves_record_unchanged() {
        let mut o = Ownership::full("Lionel");
        let transfers = o
            .transfer_ownership_of("Lionel", &[], None, InheritanceFiscalOption::FullUsufruct)
            .unwrap();
        assert!(transfers.is_empty());
        assert_eq!(o, Ownership::full("Lionel"));
    }

    #[test]
    fn test_owned_values_add_up() {
        let ages = Ages(vec![("Vanessa", 65), ("Arthur", 30), ("Lou", 26)]);
        let demembrement = Demembrement::default();
        let ctx = ValuationContext {
            year: 2030,
            ages: &ages,
            demembrement: &demembrement,
        };
        let o = Ownership::Dismembered {
            usufruct_owners: vec![Owner::new("Vanessa", 100.0)],
            bare_owners: vec![Owner::new("Arthur", 50.0), Owner::new("Lou", 50.0)],
        };
        let value = |name| o.owned_value(name, 100_000.0, EvaluationMethod::Patrimoine, &ctx);
        assert!((value("Vanessa") - 40_000.0).abs() < 1e-9);
        assert!((value("Arthur") - 30_000.0).abs() < 1e-9);
        assert!((value("Vanessa") + value("Arthur") + value("Lou") - 100_000.0).abs() < 1e-9);
        assert_eq!(
            o.owned_value("Vanessa", 100_000.0, EvaluationMethod::LegalSuccession, &ctx),
            0.0
        );
    }

    #[test]
    fn test_transfers_conserve_value() {
        let ages = Ages(vec![("Vanessa", 65), ("Arthur", 30), ("Lou", 26)]);
        let demembrement = Demembrement::default();
        let ctx = ValuationContext {
            year: 2030,
            ages: &ages,
            demembrement: &demembrement,
        };
        for option in [
            InheritanceFiscalOption::FullUsufruct,
            InheritanceFiscalOption::QuotiteDisponible,
            InheritanceFiscalOption::UsufructPlusBare,
        ] {
            let mut o = Ownership::Undismembered {
                full_owners: vec![Owner::new("Lionel", 60.0), Owner::new("Vanessa", 40.0)],
            };
            let estate = o.owned_value("Lionel", 500_000.0, EvaluationMethod::LegalSuccession, &ctx);
            let transfers = o
                .transfer_ownership_of("Lionel", &children(), Some("Vanessa"), option)
                .unwrap();
            let received: f64 = transfers.iter().map(|t| t.value(500_000.0, &ctx)).sum();
            assert!((received - estate).abs() < 1e-6, "{option:?}");
            check_invariant(&o);
        }
    }

    #[test]
    fn test_grant_full_share() {
        let mut o = Ownership::full("Lionel");
        let grants = vec![
            ShareTransfer {
                to: "Arthur".to_string(),
                kind: ShareKind::Full,
                fraction: 50.0,
            },
            ShareTransfer {
                to: "Lou".to_string(),
                kind: ShareKind::Full,
                fraction: 50.0,
            },
        ];
        let granted = o.grant_full_share("Lionel", &grants).unwrap();
        assert_eq!(granted.len(), 2);
        assert_eq!(o.full_fraction("Lou"), 50.0);
    }
}
