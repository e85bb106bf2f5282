use crate::load::MatrixLoadError;
use tracing::warn;
use trmcheck_types::matrix::{DecisionMatrix, HeaderCell, MatrixTable, VersionRow};

/// Builds quarter column labels from the two header rows of a decision page.
///
/// Year cells span several quarters, so each one is repeated `colspan` times before being paired
/// with the quarter row: `CY2025` (colspan 2) over `Q1`, `Q2` gives `"CY2025 Q1"`, `"CY2025 Q2"`.
/// Blank quarter cells produce no label.
pub fn expand_header(year_header: &[HeaderCell], quarter_header: &[String]) -> Vec<String> {
    let years: Vec<&str> = year_header
        .iter()
        .flat_map(|cell| std::iter::repeat_n(cell.text.trim(), cell.colspan as usize))
        .collect();

    if years.len() != quarter_header.len() {
        warn!(
            years = years.len(),
            quarters = quarter_header.len(),
            "year and quarter header widths differ; extra cells are ignored"
        );
    }

    years
        .iter()
        .zip(quarter_header)
        .filter_map(|(year, quarter)| {
            let quarter = quarter.trim();
            (!quarter.is_empty()).then(|| format!("{year} {quarter}"))
        })
        .collect()
}

/// Converts a snapshot table into a [`DecisionMatrix`].
///
/// Cells are trimmed and rows without any text are dropped. A table without quarter columns is
/// rejected.
pub fn expand_table(table: &MatrixTable) -> Result<DecisionMatrix, MatrixLoadError> {
    let (columns, rows) = match table {
        MatrixTable::Raw(raw) => (expand_header(&raw.year_header, &raw.quarter_header), &raw.rows),
        MatrixTable::Grid(grid) => (
            grid.columns.iter().map(|c| c.trim().to_string()).collect(),
            &grid.rows,
        ),
    };

    if columns.is_empty() {
        return Err(MatrixLoadError::Table {
            message: "table has no quarter columns".to_string(),
        });
    }

    let rows = rows
        .iter()
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .map(|cells| VersionRow::from_cells(cells.iter().map(|c| c.trim().to_string()).collect()))
        .collect();

    Ok(DecisionMatrix::new(columns, rows))
}
