//! CSV export of the social accounts and of the Monte-Carlo results table
//!
//! Every table has two header rows (groups, then items) and one row per
//! year or run. Amounts are rounded to whole euros.

use std::io::{self, Write};

use super::{columns, value_of};
use crate::model::{BalanceSheetLine, CashFlowLine, SimulationResultLine, YearRecord};

pub const SEPARATOR: &str = "; ";

const TOTAL: &str = "Total";

/// Rounded to whole units, without negative zero
fn amount(value: f64) -> String {
    format!("{:.0}", value.round() + 0.0)
}

/// Rates in percent with two decimals
fn percent(rate: f64) -> String {
    format!("{:.2}", rate * 100.0 + 0.0)
}

fn escape_field(s: &str) -> String {
    if s.contains(';') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn write_row<W: Write>(writer: &mut W, fields: &[String]) -> io::Result<()> {
    writeln!(writer, "{}", fields.join(SEPARATOR))
}

/// Any year series: item columns and a subtotal per category, then the
/// grand total. Nothing is written for an empty series.
pub fn records_csv<R: YearRecord, W: Write>(records: &[R], writer: &mut W) -> io::Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let columns = columns(records);

    let mut groups = vec!["Year".to_string()];
    let mut items = vec![String::new()];
    for category in &columns {
        for item in &category.items {
            groups.push(escape_field(&category.name));
            items.push(escape_field(item));
        }
        groups.push(escape_field(&category.name));
        items.push(TOTAL.to_string());
    }
    groups.push(TOTAL.to_string());
    items.push(String::new());
    write_row(writer, &groups)?;
    write_row(writer, &items)?;

    for record in records {
        let mut row = vec![record.year().to_string()];
        let mut grand_total = 0.0;
        for category in &columns {
            let mut subtotal = 0.0;
            for item in &category.items {
                let value = value_of(record, &category.name, item);
                subtotal += value;
                row.push(amount(value));
            }
            row.push(amount(subtotal));
            grand_total += subtotal;
        }
        row.push(amount(grand_total));
        write_row(writer, &row)?;
    }
    Ok(())
}

/// Assets and liabilities per year; the grand total is the net worth
pub fn balance_sheet_csv<W: Write>(lines: &[BalanceSheetLine], writer: &mut W) -> io::Result<()> {
    records_csv(lines, writer)
}

/// Revenues, taxes, expenses and investments per year; the grand total is
/// what remained unfunded
pub fn cash_flow_csv<W: Write>(lines: &[CashFlowLine], writer: &mut W) -> io::Result<()> {
    records_csv(lines, writer)
}

/// One row per run with its random values and KPI results
pub fn results_table_csv<W: Write>(
    lines: &[SimulationResultLine],
    writer: &mut W,
) -> io::Result<()> {
    let Some(first) = lines.first() else {
        return Ok(());
    };
    let adults: Vec<&String> = first.adults_random_properties.keys().collect();
    let kpis: Vec<&String> = first.kpi_results.iter().map(|k| &k.name).collect();

    let mut groups = vec!["Run".to_string(), "Seed".to_string()];
    let mut items = vec![String::new(), String::new()];
    for adult in &adults {
        groups.extend([escape_field(adult), escape_field(adult)]);
        items.extend(["Age of death".to_string(), "Dependency years".to_string()]);
    }
    groups.extend(std::iter::repeat_n("Economy".to_string(), 3));
    items.extend([
        "Inflation %".to_string(),
        "Secured rate %".to_string(),
        "Stock rate %".to_string(),
    ]);
    groups.extend(std::iter::repeat_n("Socio-economy".to_string(), 3));
    items.extend([
        "Pension devaluation %".to_string(),
        "Additional quarters".to_string(),
        "Expenses underestimation %".to_string(),
    ]);
    for kpi in &kpis {
        groups.extend([escape_field(kpi), escape_field(kpi)]);
        items.extend(["Value".to_string(), "Objective reached".to_string()]);
    }
    groups.push("Ran out of cash".to_string());
    items.push(String::new());
    write_row(writer, &groups)?;
    write_row(writer, &items)?;

    for line in lines {
        let mut row = vec![line.run_number.to_string(), line.seed.to_string()];
        for adult in &adults {
            match line.adults_random_properties.get(adult.as_str()) {
                Some(p) => row.extend([
                    p.age_of_death.to_string(),
                    p.nb_of_years_of_dependency.to_string(),
                ]),
                None => row.extend([String::new(), String::new()]),
            }
        }
        row.extend([
            percent(line.economy.inflation),
            percent(line.economy.secured_rate),
            percent(line.economy.stock_rate),
            percent(line.socio_economy.pension_devaluation_rate),
            amount(line.socio_economy.nb_trim_tauxplein),
            percent(line.socio_economy.expenses_under_evaluation_rate),
        ]);
        for kpi in &kpis {
            match line.kpi(kpi) {
                Some(result) => row.extend([
                    result.value.map(amount).unwrap_or_default(),
                    result.objective_reached.to_string(),
                ]),
                None => row.extend([String::new(), String::new()]),
            }
        }
        row.push(
            line.ran_out_of_cash_in
                .map(|y| y.to_string())
                .unwrap_or_default(),
        );
        write_row(writer, &row)?;
    }
    Ok(())
}
