use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use gaitscore::api::RankedTrial;
use gaitscore::config::FitnessWeights;
use gaitscore::evaluator::{FitnessBreakdown, FitnessTerm};
use strum::IntoEnumIterator;

fn term_color(term: FitnessTerm) -> Color {
    match term {
        FitnessTerm::ReferenceMotion => Color::Cyan,
        FitnessTerm::Distance => Color::Green,
        _ => Color::Reset,
    }
}

pub fn print_breakdown(name: &str, d: &FitnessBreakdown, weights: &FitnessWeights) {
    println!("\nTrial: {} ({} ticks, {} strides)", name, d.ticks, d.strides);

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Term").add_attribute(Attribute::Bold),
        Cell::new("Raw"),
        Cell::new("Weight"),
        Cell::new("Contribution").add_attribute(Attribute::Bold),
    ]);

    for term in FitnessTerm::iter() {
        let signed = term.sign() * d.weighted(term);
        table.add_row(vec![
            Cell::new(format!("{} ({})", term, term.short_name())).fg(term_color(term)),
            Cell::new(format!("{:.4}", d.raw(term))),
            Cell::new(format!("{}", term.weight(weights))),
            Cell::new(format!("{:+.4}", signed)),
        ]);
    }

    table.add_row(vec![
        Cell::new("fitness").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{:.4}", d.fitness))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);

    for i in 1..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);

    println!(
        "   diagnostics: fv std-dev {:.4}, fd std-dev {:.4}",
        d.fv_std_dev, d.fd_std_dev
    );
}

pub fn print_ranking(results: &[RankedTrial]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Trial").add_attribute(Attribute::Bold),
        Cell::new("Fitness").fg(Color::Cyan),
        Cell::new("fd"),
        Cell::new("fv"),
        Cell::new("fr"),
        Cell::new("fh"),
        Cell::new("fp").fg(Color::Green),
        Cell::new("Strides"),
        Cell::new("Ticks"),
    ]);

    for (rank, r) in results.iter().enumerate() {
        let d = &r.breakdown;
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&r.name).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.3}", d.fitness)).fg(Color::Cyan),
            Cell::new(format!("{:.4}", d.fd)),
            Cell::new(format!("{:.4}", d.fv)),
            Cell::new(format!("{:.2}", d.fr)),
            Cell::new(format!("{:.3}", d.fh)),
            Cell::new(format!("{:.2}", d.fp)).fg(Color::Green),
            Cell::new(d.strides),
            Cell::new(d.ticks),
        ]);
    }

    for i in 2..=9 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\n{}", table);
}
