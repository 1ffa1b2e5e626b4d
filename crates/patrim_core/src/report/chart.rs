use serde::{Deserialize, Serialize};

use super::{columns, value_of};
use crate::model::YearRecord;

/// Values of one item, aligned on [`ChartData::years`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub name: String,
    pub items: Vec<Series>,
    pub total: Vec<f64>,
}

/// Chart-ready series of a year series, categories in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub years: Vec<i32>,
    pub categories: Vec<CategorySeries>,
}

impl ChartData {
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategorySeries> {
        self.categories.iter().find(|c| c.name == name)
    }
}

pub fn chart_series<R: YearRecord>(records: &[R]) -> ChartData {
    let years = records.iter().map(YearRecord::year).collect();
    let categories = columns(records)
        .into_iter()
        .map(|category| {
            let items: Vec<Series> = category
                .items
                .iter()
                .map(|item| Series {
                    name: item.clone(),
                    values: records
                        .iter()
                        .map(|r| value_of(r, &category.name, item))
                        .collect(),
                })
                .collect();
            let total = (0..records.len())
                .map(|i| items.iter().map(|s| s.values[i]).sum())
                .collect();
            CategorySeries {
                name: category.name,
                items,
                total,
            }
        })
        .collect();
    ChartData { years, categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BalanceSheetLine, NamedValueTable};

    #[test]
    fn test_series_per_category() {
        let lines: Vec<BalanceSheetLine> = [(2030, 100.0, -40.0), (2031, 110.0, -30.0)]
            .into_iter()
            .map(|(year, house, loan)| BalanceSheetLine {
                year,
                assets: vec![NamedValueTable::new("Real estate").with("House", house)],
                liabilities: vec![NamedValueTable::new("Loans").with("Mortgage", loan)],
                net_worth: NamedValueTable::new("Net worth"),
            })
            .collect();
        let chart = chart_series(&lines);
        assert_eq!(chart.years, vec![2030, 2031]);
        assert_eq!(chart.categories[0].name, "Real estate");
        assert_eq!(chart.categories[0].items[0].values, vec![100.0, 110.0]);
        assert_eq!(chart.category("Loans").unwrap().total, vec![-40.0, -30.0]);
    }

    #[test]
    fn test_empty_series() {
        let chart = chart_series::<BalanceSheetLine>(&[]);
        assert!(chart.years.is_empty());
        assert!(chart.categories.is_empty());
    }
}
