//! Successions of the adults dying during a year.
//!
//! For each decedent, in family order:
//!
//! 1. legal succession of everything not paid by a beneficiary clause, the
//!    usufruct held by the decedent being extinguished;
//! 2. life-insurance succession of the contracts the decedent owns, with the
//!    current clauses;
//! 3. when a child cannot pay its inheritance tax with the capital received
//!    from the contracts, shares of the spouse in the decedent's contracts
//!    are moved to the child and the life-insurance succession is computed
//!    again, until the shortfall net of tax is covered or the spouse has
//!    nothing left;
//! 4. ownership transfers.
//!
//! Clauses naming a decedent who does not own the contract are updated
//! before any succession of the year is computed.

use tracing::{debug, warn};

use super::records::{MissingCapital, Succession, SuccessionKind};
use crate::assets::{EconomyView, FreeInvestment, Ownable, Patrimoine};
use crate::error::SimulationError;
use crate::fiscal::{FiscalModel, Relationship};
use crate::ownership::{InheritanceFiscalOption, ValuationContext};
use crate::person::Family;

/// Below this amount a shortfall is considered covered
const MISSING_CAPITAL_TOLERANCE: f64 = 0.01;
const MAX_REBALANCING_PASSES: usize = 64;

/// Everything produced by the successions of one year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuccessionOutcome {
    pub successions: Vec<Succession>,
    /// Shortfalls left after rebalancing the clauses
    pub missing_capital: Vec<MissingCapital>,
}

impl SuccessionOutcome {
    /// Inheritance taxes owed by the heirs
    #[must_use]
    pub fn taxes(&self) -> f64 {
        self.successions.iter().map(Succession::tax).sum()
    }
}

struct Heirs {
    spouse: Option<String>,
    children: Vec<String>,
    option: InheritanceFiscalOption,
}

/// Gross amounts accumulated per person, in order of first appearance
#[derive(Default)]
struct Received(Vec<(String, f64)>);

impl Received {
    fn add(&mut self, name: &str, amount: f64) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, total)) => *total += amount,
            None => self.0.push((name.to_string(), amount)),
        }
    }
}

/// Amount each child still lacks, net of its life-insurance tax
fn net_shortfalls(owed: &[(String, f64)], life_insurance: &Succession) -> Vec<(String, f64)> {
    owed.iter()
        .map(|(child, target)| {
            let received = life_insurance.inheritance_of(child).map_or(0.0, |i| i.net);
            (child.clone(), target - received)
        })
        .collect()
}

pub struct SuccessionManager<'a> {
    pub year: i32,
    pub family: &'a Family,
    pub fiscal: &'a FiscalModel,
    pub economy: EconomyView,
    /// Margin on the inheritance tax a child must be able to pay
    pub correction_factor: f64,
}

impl SuccessionManager<'_> {
    fn valuation(&self) -> ValuationContext<'_> {
        ValuationContext {
            year: self.year,
            ages: self.family,
            demembrement: &self.fiscal.demembrement,
        }
    }

    fn heirs(&self, decedent: &str) -> Heirs {
        let spouse = self.family.spouse_of(decedent, self.year);
        Heirs {
            spouse: spouse.map(|s| s.name().to_string()),
            // the surviving spouse chooses the option
            option: spouse
                .and_then(|s| s.adult())
                .map(|a| a.fiscal_option)
                .unwrap_or_default(),
            children: self
                .family
                .children()
                .filter(|c| c.is_alive(self.year))
                .map(|c| c.name().to_string())
                .collect(),
        }
    }

    fn relationship(&self, heirs: &Heirs, name: &str) -> Relationship {
        if heirs.spouse.as_deref() == Some(name) {
            Relationship::Spouse
        } else if self.family.member(name).is_some_and(|m| m.is_child()) {
            Relationship::Child
        } else {
            Relationship::Other
        }
    }

    fn is_alive(&self, name: &str) -> bool {
        // people outside the family are assumed alive
        self.family
            .member(name)
            .is_none_or(|m| m.is_alive(self.year))
    }

    /// Contract owned in full by `decedent` and paid to living recipients
    fn is_paid_by_clause(&self, investment: &FreeInvestment, decedent: &str) -> bool {
        investment.ownership.is_full_owner(decedent)
            && investment.clause().is_some_and(|clause| {
                let shares = clause.recipient_shares();
                !shares.is_empty()
                    && shares
                        .iter()
                        .all(|s| s.to != decedent && self.is_alive(&s.to))
            })
    }

    pub fn manage_successions(
        &self,
        decedents: &[String],
        patrimoine: &mut Patrimoine,
    ) -> Result<SuccessionOutcome, SimulationError> {
        let mut outcome = SuccessionOutcome::default();
        self.update_clauses(decedents, patrimoine);
        for decedent in decedents {
            self.manage_succession(decedent, patrimoine, &mut outcome)?;
        }
        Ok(outcome)
    }

    /// Clauses naming a decedent who does not own the contract
    fn update_clauses(&self, decedents: &[String], patrimoine: &mut Patrimoine) {
        let children: Vec<String> = self
            .family
            .children()
            .filter(|c| c.is_alive(self.year))
            .map(|c| c.name().to_string())
            .collect();
        for investment in &mut patrimoine.assets.free_investments {
            for decedent in decedents {
                if investment.ownership.has_an_owner_named(decedent) {
                    continue;
                }
                let name = investment.name.clone();
                if let Some(clause) = investment.clause_mut()
                    && clause.manage_recipient_death(decedent, &children)
                {
                    debug!(contract = %name, decedent = %decedent, "clause updated after recipient death");
                }
            }
        }
    }

    fn manage_succession(
        &self,
        decedent: &str,
        patrimoine: &mut Patrimoine,
        outcome: &mut SuccessionOutcome,
    ) -> Result<(), SimulationError> {
        let heirs = self.heirs(decedent);
        let paid_by_clause: Vec<String> = patrimoine
            .assets
            .free_investments
            .iter()
            .filter(|inv| self.is_paid_by_clause(inv, decedent))
            .map(|inv| inv.name.clone())
            .collect();

        // 1. legal succession, ownership changes kept until every asset is done
        let ctx = self.valuation();
        let mut received = Received::default();
        let mut next_ownerships = Vec::new();
        for item in patrimoine.items() {
            if !item.ownership().has_an_owner_named(decedent)
                || (item.is_life_insurance() && paid_by_clause.iter().any(|n| n == item.name()))
            {
                next_ownerships.push(None);
                continue;
            }
            let mut ownership = item.ownership().clone();
            let transfers = ownership.transfer_ownership_of(
                decedent,
                &heirs.children,
                heirs.spouse.as_deref(),
                heirs.option,
            )?;
            if transfers.is_empty() && ownership == *item.ownership() {
                warn!(year = self.year, decedent = %decedent, item = %item.name(), "no heir, ownership left unchanged");
                next_ownerships.push(None);
                continue;
            }
            let value = item.value(self.year, &self.economy);
            for transfer in &transfers {
                received.add(&transfer.to, transfer.value(value, &ctx));
            }
            next_ownerships.push(Some(ownership));
        }
        let legal = self.taxed(&heirs, received, |brut, relationship| {
            self.fiscal.inheritance_taxes.heir_tax(brut, relationship)
        })?;
        let legal = Succession::new(self.year, decedent, SuccessionKind::Legal, legal);

        // 2. life insurance with the current clauses
        let mut life_insurance =
            self.life_insurance_succession(decedent, &heirs, &paid_by_clause, patrimoine)?;

        // 3. children short of capital to pay their inheritance tax
        if let Some(spouse) = heirs.spouse.as_deref() {
            let owed: Vec<(String, f64)> = heirs
                .children
                .iter()
                .map(|child| {
                    let tax = legal.inheritance_of(child).map_or(0.0, |i| i.tax);
                    (child.clone(), self.correction_factor * tax)
                })
                .collect();
            let mut missing = net_shortfalls(&owed, &life_insurance);
            // moved capital is taxed, a pass covers only part of the net shortfall
            for _ in 0..MAX_REBALANCING_PASSES {
                if missing.iter().all(|(_, amount)| *amount <= MISSING_CAPITAL_TOLERANCE) {
                    break;
                }
                let mut to_move = missing.clone();
                let moved = self.rebalance_clauses(
                    decedent,
                    spouse,
                    &paid_by_clause,
                    &mut to_move,
                    patrimoine,
                );
                if !moved {
                    break;
                }
                life_insurance =
                    self.life_insurance_succession(decedent, &heirs, &paid_by_clause, patrimoine)?;
                missing = net_shortfalls(&owed, &life_insurance);
            }
            for (heir, amount) in missing {
                if amount > MISSING_CAPITAL_TOLERANCE {
                    warn!(year = self.year, decedent = %decedent, heir = %heir, amount, "missing capital to pay inheritance tax");
                    outcome.missing_capital.push(MissingCapital {
                        year: self.year,
                        decedent: decedent.to_string(),
                        heir,
                        amount,
                    });
                }
            }
        }

        // 4. ownership transfers
        for (item, next) in patrimoine.items_mut().zip(next_ownerships) {
            if let Some(ownership) = next {
                *item.ownership_mut() = ownership;
            }
        }
        for investment in &mut patrimoine.assets.free_investments {
            if !paid_by_clause.contains(&investment.name) {
                continue;
            }
            let grants = investment
                .clause()
                .map(|clause| clause.recipient_shares())
                .unwrap_or_default();
            investment.ownership.grant_full_share(decedent, &grants)?;
        }

        debug!(
            year = self.year,
            decedent = %decedent,
            legal = legal.taxable_value,
            life_insurance = life_insurance.taxable_value,
            "succession computed"
        );
        outcome.successions.push(legal);
        if !paid_by_clause.is_empty() {
            outcome.successions.push(life_insurance);
        }
        Ok(())
    }

    /// Tax of each heir on its gross amount
    fn taxed(
        &self,
        heirs: &Heirs,
        received: Received,
        tax: impl Fn(f64, Relationship) -> Result<f64, crate::error::FiscalError>,
    ) -> Result<Vec<(String, f64, f64)>, SimulationError> {
        received
            .0
            .into_iter()
            .map(|(name, brut)| {
                let tax = tax(brut, self.relationship(heirs, &name))?;
                Ok((name, brut, tax))
            })
            .collect()
    }

    fn life_insurance_succession(
        &self,
        decedent: &str,
        heirs: &Heirs,
        paid_by_clause: &[String],
        patrimoine: &Patrimoine,
    ) -> Result<Succession, SimulationError> {
        let ctx = self.valuation();
        let cutoff = self.fiscal.life_insurance_taxes.cutoff_date;
        let mut received = Received::default();
        let mut taxable = Received::default();
        for investment in &patrimoine.assets.free_investments {
            if !paid_by_clause.contains(&investment.name) {
                continue;
            }
            let Some(clause) = investment.clause() else {
                continue;
            };
            let capital =
                investment.ownership.full_fraction(decedent) / 100.0 * investment.current_value();
            let exempt = investment.opening_date().is_some_and(|d| d < cutoff);
            for share in clause.recipient_shares() {
                let value = share.value(capital, &ctx);
                received.add(&share.to, value);
                if !exempt {
                    taxable.add(&share.to, value);
                }
            }
        }
        let taxes = &self.fiscal.life_insurance_taxes;
        let inheritances = received
            .0
            .into_iter()
            .map(|(name, brut)| {
                let base = taxable
                    .0
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map_or(0.0, |(_, v)| *v);
                let tax = taxes.flat_tax(base, self.relationship(heirs, &name), None)?;
                Ok((name, brut, tax))
            })
            .collect::<Result<Vec<_>, SimulationError>>()?;
        Ok(Succession::new(
            self.year,
            decedent,
            SuccessionKind::LifeInsurance,
            inheritances,
        ))
    }

    /// Move shares of `spouse` to the children still short of capital, in
    /// contract declaration order. Returns whether any clause changed.
    fn rebalance_clauses(
        &self,
        decedent: &str,
        spouse: &str,
        paid_by_clause: &[String],
        missing: &mut [(String, f64)],
        patrimoine: &mut Patrimoine,
    ) -> bool {
        let mut changed = false;
        for investment in &mut patrimoine.assets.free_investments {
            if !paid_by_clause.contains(&investment.name) {
                continue;
            }
            let capital =
                investment.ownership.full_fraction(decedent) / 100.0 * investment.current_value();
            if capital <= 0.0 {
                continue;
            }
            let Some(clause) = investment.clause_mut() else {
                continue;
            };
            for (child, amount) in missing.iter_mut() {
                if *amount <= MISSING_CAPITAL_TOLERANCE {
                    continue;
                }
                let moved = clause.move_share(spouse, child, *amount / capital * 100.0);
                if moved > 0.0 {
                    *amount -= moved / 100.0 * capital;
                    changed = true;
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Debt, InterestRate, InvestmentState, InvestmentType, RealEstateAsset};
    use crate::config::{AdultBuilder, ChildBuilder};
    use crate::economy::Rates;
    use crate::ownership::{ClauseRecipients, EvaluationMethod, LifeInsuranceClause, Owner, Ownership};
    use crate::person::Sex;
    use jiff::civil::date;

    const YEAR: i32 = 2030;

    fn family(option: InheritanceFiscalOption) -> Family {
        Family::from_members(vec![
            AdultBuilder::new("Lionel", Sex::Male, date(1960, 5, 1))
                .age_of_death(70)
                .build(),
            AdultBuilder::new("Vanessa", Sex::Female, date(1962, 2, 1))
                .age_of_death(90)
                .fiscal_option(option)
                .build(),
            ChildBuilder::new("Arthur", Sex::Male, date(1990, 6, 1)).build(),
            ChildBuilder::new("Lina", Sex::Female, date(1992, 3, 1)).build(),
        ])
        .unwrap()
    }

    fn economy() -> EconomyView {
        EconomyView {
            inflation: 0.0,
            rates: Rates {
                secured: 0.02,
                stock: 0.06,
            },
        }
    }

    fn house(ownership: Ownership, value: f64) -> RealEstateAsset {
        RealEstateAsset {
            name: "House".to_string(),
            ownership,
            buying_year: 2000,
            buying_price: 150_000.0,
            estimated_value: value,
            selling_year: None,
            selling_price: None,
            is_inhabited: true,
            rental: None,
            yearly_local_taxes: 0.0,
        }
    }

    fn contract(name: &str, owner: &str, clause: LifeInsuranceClause, value: f64) -> FreeInvestment {
        FreeInvestment::new(
            name,
            Ownership::full(owner),
            InvestmentType::LifeInsurance {
                clause,
                opening_date: Some(date(2010, 1, 1)),
            },
            InterestRate::Contractual { rate: 0.02 },
            InvestmentState {
                investment: value,
                interest: 0.0,
            },
        )
    }

    fn manager<'a>(family: &'a Family, fiscal: &'a FiscalModel) -> SuccessionManager<'a> {
        SuccessionManager {
            year: YEAR,
            family,
            fiscal,
            economy: economy(),
            correction_factor: 1.3,
        }
    }

    fn decedent() -> Vec<String> {
        vec!["Lionel".to_string()]
    }

    #[test]
    fn test_legal_succession_conserves_value() {
        let family = family(InheritanceFiscalOption::FullUsufruct);
        let fiscal = FiscalModel::default();
        let shared = Ownership::Undismembered {
            full_owners: vec![Owner::new("Lionel", 50.0), Owner::new("Vanessa", 50.0)],
        };
        let mut patrimoine = Patrimoine::default();
        patrimoine.assets.real_estates.push(house(shared.clone(), 400_000.0));
        patrimoine.assets.free_investments.push(FreeInvestment::new(
            "Savings",
            Ownership::full("Lionel"),
            InvestmentType::Other,
            InterestRate::Contractual { rate: 0.02 },
            InvestmentState {
                investment: 100_000.0,
                interest: 0.0,
            },
        ));
        patrimoine.liabilities.debts.push(Debt {
            name: "Family loan".to_string(),
            ownership: shared,
            value: -20_000.0,
        });

        let ctx = ValuationContext {
            year: YEAR,
            ages: &family,
            demembrement: &fiscal.demembrement,
        };
        let estate = patrimoine.owned_value(
            "Lionel",
            YEAR,
            &economy(),
            EvaluationMethod::LegalSuccession,
            &ctx,
        );
        assert!((estate - 290_000.0).abs() < 1e-6);

        let outcome = manager(&family, &fiscal)
            .manage_successions(&decedent(), &mut patrimoine)
            .unwrap();
        assert_eq!(outcome.successions.len(), 1);
        let legal = &outcome.successions[0];
        assert_eq!(legal.kind, SuccessionKind::Legal);
        assert!((legal.taxable_value - estate).abs() < 1e-6);

        // Vanessa is 68: usufruct worth 40 %
        let vanessa = legal.inheritance_of("Vanessa").unwrap();
        assert!((vanessa.brut - 116_000.0).abs() < 1e-6);
        assert_eq!(vanessa.tax, 0.0);
        let arthur = legal.inheritance_of("Arthur").unwrap();
        assert!((arthur.brut - 87_000.0).abs() < 1e-6);
        // below the child allowance
        assert_eq!(outcome.taxes(), 0.0);
        assert!(outcome.missing_capital.is_empty());

        for item in patrimoine.items() {
            assert!(!item.ownership().has_an_owner_named("Lionel"));
            assert!(item.ownership().validate().is_ok());
        }
        assert_eq!(
            patrimoine.assets.free_investments[0].ownership,
            Ownership::Dismembered {
                usufruct_owners: vec![Owner::new("Vanessa", 100.0)],
                bare_owners: vec![Owner::new("Arthur", 50.0), Owner::new("Lina", 50.0)],
            }
        );
    }

    #[test]
    fn test_life_insurance_paid_by_clause() {
        let family = family(InheritanceFiscalOption::FullUsufruct);
        let fiscal = FiscalModel::default();
        let clause = LifeInsuranceClause::full(vec![
            Owner::new("Arthur", 50.0),
            Owner::new("Lina", 50.0),
        ]);
        let mut patrimoine = Patrimoine::default();
        patrimoine
            .assets
            .free_investments
            .push(contract("Contract", "Lionel", clause, 400_000.0));

        let outcome = manager(&family, &fiscal)
            .manage_successions(&decedent(), &mut patrimoine)
            .unwrap();
        assert_eq!(outcome.successions.len(), 2);
        assert_eq!(outcome.successions[0].taxable_value, 0.0);
        let life_insurance = &outcome.successions[1];
        assert_eq!(life_insurance.kind, SuccessionKind::LifeInsurance);
        let arthur = life_insurance.inheritance_of("Arthur").unwrap();
        assert!((arthur.brut - 200_000.0).abs() < 1e-6);
        // 20 % above the allowance
        assert!((arthur.tax - (200_000.0 - 152_500.0) * 0.20).abs() < 1e-6);
        assert_eq!(
            patrimoine.assets.free_investments[0].ownership,
            Ownership::Undismembered {
                full_owners: vec![Owner::new("Arthur", 50.0), Owner::new("Lina", 50.0)],
            }
        );
    }

    #[test]
    fn test_old_contract_exempt() {
        let family = family(InheritanceFiscalOption::FullUsufruct);
        let fiscal = FiscalModel::default();
        let clause = LifeInsuranceClause::full(vec![Owner::new("Arthur", 100.0)]);
        let mut investment = contract("Contract", "Lionel", clause, 400_000.0);
        if let InvestmentType::LifeInsurance { opening_date, .. } = &mut investment.investment_type {
            *opening_date = Some(date(1990, 1, 1));
        }
        let mut patrimoine = Patrimoine::default();
        patrimoine.assets.free_investments.push(investment);

        let outcome = manager(&family, &fiscal)
            .manage_successions(&decedent(), &mut patrimoine)
            .unwrap();
        assert_eq!(outcome.taxes(), 0.0);
        assert_eq!(outcome.successions[1].taxable_value, 400_000.0);
    }

    #[test]
    fn test_spouse_share_moved_to_children_short_of_capital() {
        let family = family(InheritanceFiscalOption::QuotiteDisponible);
        let fiscal = FiscalModel::default();
        let mut patrimoine = Patrimoine::default();
        patrimoine
            .assets
            .real_estates
            .push(house(Ownership::full("Lionel"), 2_000_000.0));
        let clause = LifeInsuranceClause::full(vec![Owner::new("Vanessa", 100.0)]);
        patrimoine
            .assets
            .free_investments
            .push(contract("Contract", "Lionel", clause, 500_000.0));

        let outcome = manager(&family, &fiscal)
            .manage_successions(&decedent(), &mut patrimoine)
            .unwrap();
        assert!(outcome.missing_capital.is_empty());
        let legal = &outcome.successions[0];
        let life_insurance = &outcome.successions[1];
        for child in ["Arthur", "Lina"] {
            let owed = legal.inheritance_of(child).unwrap().tax;
            assert!(owed > 0.0);
            let received = life_insurance.inheritance_of(child).unwrap();
            // below the life-insurance allowance: no tax on the capital moved
            assert_eq!(received.tax, 0.0);
            assert!((received.net - 1.3 * owed).abs() < 1e-3);
        }
        let vanessa = life_insurance.inheritance_of("Vanessa").unwrap();
        assert!((life_insurance.taxable_value - 500_000.0).abs() < 1e-6);
        assert!(vanessa.brut < 500_000.0);
    }

    #[test]
    fn test_missing_capital_reported() {
        let family = family(InheritanceFiscalOption::QuotiteDisponible);
        let fiscal = FiscalModel::default();
        let mut patrimoine = Patrimoine::default();
        patrimoine
            .assets
            .real_estates
            .push(house(Ownership::full("Lionel"), 2_000_000.0));
        let clause = LifeInsuranceClause::full(vec![Owner::new("Vanessa", 100.0)]);
        patrimoine
            .assets
            .free_investments
            .push(contract("Contract", "Lionel", clause, 100_000.0));

        let outcome = manager(&family, &fiscal)
            .manage_successions(&decedent(), &mut patrimoine)
            .unwrap();
        // the whole contract goes to the first child, not enough for either
        assert_eq!(outcome.missing_capital.len(), 2);
        assert_eq!(outcome.missing_capital[0].heir, "Arthur");
        assert_eq!(outcome.missing_capital[1].heir, "Lina");
        let owed = outcome.successions[0].inheritance_of("Lina").unwrap().tax;
        assert!((outcome.missing_capital[1].amount - 1.3 * owed).abs() < 1e-6);
        assert!(
            (outcome.missing_capital[0].amount - (1.3 * owed - 100_000.0)).abs() < 1e-6
        );
        assert_eq!(
            patrimoine.assets.free_investments[0].ownership,
            Ownership::full("Arthur")
        );
    }

    #[test]
    fn test_taxed_capital_moved_until_net_covered() {
        let family = family(InheritanceFiscalOption::QuotiteDisponible);
        let fiscal = FiscalModel::default();
        let mut patrimoine = Patrimoine::default();
        patrimoine
            .assets
            .real_estates
            .push(house(Ownership::full("Lionel"), 4_000_000.0));
        let clause = LifeInsuranceClause::full(vec![Owner::new("Vanessa", 100.0)]);
        patrimoine
            .assets
            .free_investments
            .push(contract("Contract", "Lionel", clause, 3_000_000.0));

        let outcome = manager(&family, &fiscal)
            .manage_successions(&decedent(), &mut patrimoine)
            .unwrap();
        assert!(outcome.missing_capital.is_empty());
        let legal = &outcome.successions[0];
        let life_insurance = &outcome.successions[1];
        for child in ["Arthur", "Lina"] {
            let owed = legal.inheritance_of(child).unwrap().tax;
            let received = life_insurance.inheritance_of(child).unwrap();
            // above the life-insurance allowance
            assert!(received.tax > 0.0);
            assert!(received.net >= 1.3 * owed - MISSING_CAPITAL_TOLERANCE);
            assert!(received.net <= 1.3 * owed + 1e-6);
        }
        assert!((life_insurance.taxable_value - 3_000_000.0).abs() < 1e-6);
        assert!(life_insurance.inheritance_of("Vanessa").unwrap().brut > 0.0);
    }

    #[test]
    fn test_missing_capital_is_net_of_life_insurance_tax() {
        let family = family(InheritanceFiscalOption::QuotiteDisponible);
        let fiscal = FiscalModel::default();
        let mut patrimoine = Patrimoine::default();
        patrimoine
            .assets
            .real_estates
            .push(house(Ownership::full("Lionel"), 4_000_000.0));
        let clause = LifeInsuranceClause::full(vec![Owner::new("Vanessa", 100.0)]);
        patrimoine
            .assets
            .free_investments
            .push(contract("Contract", "Lionel", clause, 600_000.0));

        let outcome = manager(&family, &fiscal)
            .manage_successions(&decedent(), &mut patrimoine)
            .unwrap();
        let legal = &outcome.successions[0];
        let life_insurance = &outcome.successions[1];
        assert!(life_insurance.inheritance_of("Vanessa").is_none());
        assert!(life_insurance.inheritance_of("Arthur").unwrap().tax > 0.0);
        assert_eq!(outcome.missing_capital.len(), 2);
        for missing in &outcome.missing_capital {
            let owed = legal.inheritance_of(&missing.heir).unwrap().tax;
            let received = life_insurance.inheritance_of(&missing.heir).unwrap();
            assert!((missing.amount - (1.3 * owed - received.net)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_clause_updated_when_recipient_dies() {
        let family = family(InheritanceFiscalOption::FullUsufruct);
        let fiscal = FiscalModel::default();
        let clause = LifeInsuranceClause::full(vec![Owner::new("Lionel", 100.0)]);
        let mut patrimoine = Patrimoine::default();
        patrimoine
            .assets
            .free_investments
            .push(contract("Contract", "Vanessa", clause, 100_000.0));

        let outcome = manager(&family, &fiscal)
            .manage_successions(&decedent(), &mut patrimoine)
            .unwrap();
        assert_eq!(outcome.successions[0].taxable_value, 0.0);
        let investment = &patrimoine.assets.free_investments[0];
        assert_eq!(investment.ownership, Ownership::full("Vanessa"));
        assert_eq!(
            investment.clause().unwrap().recipients,
            ClauseRecipients::Full {
                recipients: vec![Owner::new("Arthur", 50.0), Owner::new("Lina", 50.0)],
            }
        );
    }
}
