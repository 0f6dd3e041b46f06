//! Formatted terminal output for books and calibration fits.
//!
//! Formatting lives here so the partitioner and fitter stay free of
//! presentation concerns.

use crate::domain::{Book, CalibrationConfig, FitResult, FitSelection, Partition, PartitionConfig};
use crate::io::IngredientIndex;

/// Summary of a partition run: one block per category, one line per book.
pub fn format_books_summary(partition: &Partition, ingredients: &IngredientIndex, config: &PartitionConfig) -> String {
    let mut out = String::new();

    out.push_str("=== bk - Recipe Books ===\n");
    out.push_str(&format!(
        "Capacity: {} ingredients | min drinks per book: {}\n",
        config.capacity, config.min_group_size
    ));
    out.push_str(&format!(
        "Books: {} across {} categories | drinks placed: {} | dropped: {}\n",
        partition.book_count(),
        partition.books.len(),
        partition.placed_item_count(),
        partition.dropped.len()
    ));

    for (category, books) in &partition.books {
        out.push_str(&format!("\n{category}\n"));
        for book in books {
            out.push_str(&format_book_line(book, ingredients));
        }
    }

    if !partition.dropped.is_empty() {
        let ids: Vec<String> = partition.dropped.iter().map(|i| i.id.to_string()).collect();
        out.push_str(&format!("\nDropped drinks: {}\n", ids.join(", ")));
    }

    out
}

fn format_book_line(book: &Book, ingredients: &IngredientIndex) -> String {
    let mut line = format!(
        "  {:<28} {:>2} drinks · {:>2} ingredients",
        book.label,
        book.items.len(),
        book.resource_ids.len()
    );
    let spirits = ingredients.spirits_in(&book.resource_ids);
    if !spirits.is_empty() {
        line.push_str(&format!(" · bases: {}", spirits.join(", ")));
    }
    line.push('\n');

    let names: Vec<String> = book
        .items
        .iter()
        .map(|i| i.name.clone().unwrap_or_else(|| format!("#{}", i.id)))
        .collect();
    line.push_str(&format!("    {}\n", names.join(", ")));
    line
}

/// Summary of a calibration fit: observed rates, both candidates, chosen model.
pub fn format_calibration_summary(selection: &FitSelection, config: &CalibrationConfig) -> String {
    let mut out = String::new();

    out.push_str("=== bk - Flow Calibration ===\n");
    out.push_str(&format!("Reference volume: {:.6}\n", config.reference_volume));
    out.push_str("\n  x   rate/s    linear    log\n");
    for (i, (&x, &rate)) in selection.xs.iter().zip(&selection.rates).enumerate() {
        out.push_str(&format!(
            "{x:>3} {rate:>9.5} {:>9.5} {:>9.5}\n",
            selection.linear.predicted_y[i], selection.logarithmic.predicted_y[i]
        ));
    }

    out.push_str("\nModel diagnostics:\n");
    for fit in [&selection.linear, &selection.logarithmic] {
        let chosen = if fit.model == selection.best.model { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<16} SSE={:.6e} RMSE={:.6}  {}\n",
            fit.model.display_name(),
            fit.sse,
            fit.rmse(),
            fit.equation()
        ));
    }

    out.push_str(&format!(
        "\nChosen model: {} ({})\n",
        selection.best.model.display_name(),
        selection.best.equation()
    ));

    if !config.predict_at.is_empty() {
        out.push_str(&format_predictions(&selection.best, &config.predict_at));
    }

    out
}

/// Extrapolated rates at the requested `x` values.
pub fn format_predictions(fit: &FitResult, xs: &[u32]) -> String {
    let mut out = String::from("\nPredicted:\n");
    for &x in xs {
        let rate = fit.predict(f64::from(x));
        if rate.is_finite() && rate > 0.0 {
            out.push_str(&format!("  x={x:<3} rate={rate:.5}/s\n"));
        } else {
            out.push_str(&format!("  x={x:<3} rate=n/a\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ingredient, Item, Sample};
    use crate::fit::fit_and_select;
    use crate::partition::partition_with_report;

    #[test]
    fn books_summary_lists_books_and_bases() {
        let items = vec![
            Item::new(1, "Sour", [1, 2]).with_name("Daiquiri"),
            Item::new(2, "Sour", [1, 3]).with_name("Gimlet"),
            Item::new(3, "Sour", [2, 3]),
            Item::new(4, "Tiki", [4]).with_name("Lonely"),
        ];
        let config = PartitionConfig::default();
        let partition = partition_with_report(&items, &config);
        let ingredients = IngredientIndex::new(vec![Ingredient {
            id: 1,
            name: "Rum".to_string(),
            kind: "Spirit".to_string(),
        }]);

        let txt = format_books_summary(&partition, &ingredients, &config);
        assert!(txt.contains("Books: 1 across 1 categories | drinks placed: 3 | dropped: 1"));
        assert!(txt.contains("Sour Picks"));
        assert!(txt.contains("bases: rum"));
        assert!(txt.contains("Daiquiri, Gimlet, #3"));
        assert!(txt.contains("Dropped drinks: 4"));
    }

    #[test]
    fn calibration_summary_marks_chosen_model() {
        let samples = vec![Sample::new(1, 1000.0), Sample::new(2, 1000.0)];
        let selection = fit_and_select(&samples, 1.0).unwrap();
        let config = CalibrationConfig {
            reference_volume: 1.0,
            predict_at: vec![3],
            ..CalibrationConfig::default()
        };

        let txt = format_calibration_summary(&selection, &config);
        assert!(txt.contains("* Linear Fit"));
        assert!(txt.contains("Chosen model: Linear Fit (y = 0.000x + 1.000)"));
        assert!(txt.contains("x=3   rate=1.00000/s"));
    }
}
