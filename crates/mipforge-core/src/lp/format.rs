//! LP-format export.
//!
//! Writes a model in the CPLEX LP text format so it can be inspected or
//! fed to another solver. Ranged rows are split into a `_lo` and a `_hi`
//! constraint; unnamed columns and rows get `x<j>` / `r<i>` names.

use std::fmt::{self, Write};

use super::problem::{LpProblem, ObjectiveSense};

/// Renders `problem` in LP format.
///
/// # Example
///
/// ```
/// use mipforge_core::{write_lp, Column, LpProblem, Row};
///
/// let mut problem = LpProblem::maximize("tiny");
/// let x = problem.add_column(Column::binary("x", 2.0)).unwrap();
/// problem.add_row(Row::le("cap", vec![(x, 1.0)], 1.0)).unwrap();
///
/// let text = write_lp(&problem);
/// assert!(text.starts_with("\\ Problem: tiny\nMaximize\n obj: 2 x\n"));
/// assert!(text.contains(" cap: x <= 1\n"));
/// assert!(text.contains("General\n x\n"));
/// assert!(text.ends_with("End\n"));
/// ```
pub fn write_lp(problem: &LpProblem) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render(problem, &mut out);
    out
}

fn render(problem: &LpProblem, out: &mut String) -> fmt::Result {
    let names: Vec<String> = problem
        .columns()
        .iter()
        .enumerate()
        .map(|(j, c)| {
            if c.name.is_empty() {
                format!("x{}", j)
            } else {
                c.name.clone()
            }
        })
        .collect();

    writeln!(out, "\\ Problem: {}", problem.name())?;
    match problem.sense() {
        ObjectiveSense::Minimize => writeln!(out, "Minimize")?,
        ObjectiveSense::Maximize => writeln!(out, "Maximize")?,
    }
    let objective: Vec<(usize, f64)> = problem
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.objective != 0.0)
        .map(|(j, c)| (j, c.objective))
        .collect();
    writeln!(out, " obj: {}", expression(&objective, &names))?;

    writeln!(out, "Subject To")?;
    for (i, row) in problem.rows().iter().enumerate() {
        let name = if row.name.is_empty() {
            format!("r{}", i)
        } else {
            row.name.clone()
        };
        let expr = expression(&row.coefficients, &names);
        match (row.lower.is_finite(), row.upper.is_finite()) {
            (true, true) if row.lower == row.upper => {
                writeln!(out, " {}: {} = {}", name, expr, row.lower)?
            }
            (true, true) => {
                writeln!(out, " {}_lo: {} >= {}", name, expr, row.lower)?;
                writeln!(out, " {}_hi: {} <= {}", name, expr, row.upper)?;
            }
            (true, false) => writeln!(out, " {}: {} >= {}", name, expr, row.lower)?,
            (false, true) => writeln!(out, " {}: {} <= {}", name, expr, row.upper)?,
            (false, false) => {}
        }
    }

    writeln!(out, "Bounds")?;
    for (column, name) in problem.columns().iter().zip(&names) {
        match (column.lower.is_finite(), column.upper.is_finite()) {
            (false, false) => writeln!(out, " {} free", name)?,
            (true, true) if column.lower == column.upper => {
                writeln!(out, " {} = {}", name, column.lower)?
            }
            (true, true) => writeln!(out, " {} <= {} <= {}", column.lower, name, column.upper)?,
            (true, false) => writeln!(out, " {} >= {}", name, column.lower)?,
            (false, true) => {
                writeln!(out, " -inf <= {} <= {}", name, column.upper)?
            }
        }
    }

    let integers: Vec<&String> = problem
        .columns()
        .iter()
        .zip(&names)
        .filter(|(c, _)| c.integer)
        .map(|(_, n)| n)
        .collect();
    if !integers.is_empty() {
        writeln!(out, "General")?;
        for name in integers {
            writeln!(out, " {}", name)?;
        }
    }
    writeln!(out, "End")
}

fn expression(terms: &[(usize, f64)], names: &[String]) -> String {
    if terms.is_empty() {
        return "0".to_string();
    }
    let mut out = String::new();
    for (k, &(col, a)) in terms.iter().enumerate() {
        let name = &names[col];
        let magnitude = a.abs();
        if k == 0 {
            if a < 0.0 {
                out.push('-');
            }
        } else if a < 0.0 {
            out.push_str(" - ");
        } else {
            out.push_str(" + ");
        }
        if magnitude == 1.0 {
            out.push_str(name);
        } else {
            out.push_str(&format!("{} {}", magnitude, name));
        }
    }
    out
}
