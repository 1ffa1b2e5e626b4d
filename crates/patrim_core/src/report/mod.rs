//! Flattening of the social accounts into CSV rows and chart series

pub mod chart;
pub mod csv;

pub use chart::{CategorySeries, ChartData, Series, chart_series};
pub use csv::{SEPARATOR, balance_sheet_csv, cash_flow_csv, records_csv, results_table_csv};

use crate::model::YearRecord;

/// Items of one category over a whole series
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryColumns {
    pub name: String,
    pub items: Vec<String>,
}

/// Union of the categories and items of `records`, in order of first
/// appearance
pub(crate) fn columns<R: YearRecord>(records: &[R]) -> Vec<CategoryColumns> {
    let mut columns: Vec<CategoryColumns> = Vec::new();
    for record in records {
        for table in record.categories() {
            let index = match columns.iter().position(|c| c.name == table.name) {
                Some(index) => index,
                None => {
                    columns.push(CategoryColumns {
                        name: table.name.clone(),
                        items: Vec::new(),
                    });
                    columns.len() - 1
                }
            };
            let category = &mut columns[index];
            for value in &table.values {
                if !category.items.contains(&value.name) {
                    category.items.push(value.name.clone());
                }
            }
        }
    }
    columns
}

/// Value of `item` in `category` for one record; absent values are zero
pub(crate) fn value_of<R: YearRecord>(record: &R, category: &str, item: &str) -> f64 {
    record
        .categories()
        .into_iter()
        .find(|t| t.name == category)
        .and_then(|t| t.value(item))
        .unwrap_or(0.0)
}
