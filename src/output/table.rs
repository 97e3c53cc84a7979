//! Two-dimensional output of the sorted sequence
//!
//! The rows of a linearized tree, in pre-order, as an aligned plain-text
//! table or an HTML table. Numeric cells are right-aligned.

use serde_json::Value;

use crate::error::TreeError;
use crate::record::value_to_text;
use crate::tree::AdjacencyTree;

use super::json::flat_rows;

#[derive(Debug, Clone, PartialEq)]
pub struct TableFormatter {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TableFormatter {
    /// Collect the rows of `tree`.
    ///
    /// With no `columns`, every column any row has is shown, in the order the
    /// columns first appear.
    pub fn from_tree(tree: &AdjacencyTree, columns: &[String]) -> Result<Self, TreeError> {
        let records = flat_rows(tree)?;

        let columns = if columns.is_empty() {
            let mut all: Vec<String> = Vec::new();
            for record in &records {
                for key in record.keys() {
                    if !all.contains(key) {
                        all.push(key.clone());
                    }
                }
            }
            all
        } else {
            columns.to_vec()
        };

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Aligned plain-text table with a header line.
    pub fn to_plain(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(value_to_text).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, &width)| pad(name, width, false))
            .collect();
        push_line(&mut out, &header);

        for (row, texts) in self.rows.iter().zip(&cells) {
            let line: Vec<String> = row
                .iter()
                .zip(texts)
                .zip(&widths)
                .map(|((value, text), &width)| pad(text, width, value.is_number()))
                .collect();
            push_line(&mut out, &line);
        }
        out
    }

    /// HTML table with a header row.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<table>\n<tr>");
        for name in &self.columns {
            out.push_str(&format!("<th>{}</th>", name));
        }
        out.push_str("</tr>\n");

        for row in &self.rows {
            out.push_str("<tr>");
            for value in row {
                if value.is_number() {
                    out.push_str(&format!("<td class=\"number\">{}</td>", value_to_text(value)));
                } else {
                    out.push_str(&format!("<td>{}</td>", value_to_text(value)));
                }
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>\n");
        out
    }
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn push_line(out: &mut String, cells: &[String]) {
    out.push_str(cells.join("  ").trim_end());
    out.push('\n');
}
