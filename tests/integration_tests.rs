use std::collections::HashSet;

use fieldgen::{
    export, randomize_factorial, DesignBuilder, DesignError, DesignKind, FactorialBuilder,
    Factorial, FieldLayout, LayoutOrder,
};

fn nk_factorial() -> Factorial {
    FactorialBuilder::default()
        .factor("nitrogen", "N", &[0, 100, 200])
        .factor("potassium", "K", &[0, 30, 60])
        .build()
        .unwrap()
}

#[test]
fn crd_example_covers_36_plots_with_4_replicates_each() {
    let assignments = randomize_factorial(&nk_factorial(), 4, DesignKind::Crd, 42).unwrap();

    let plots: HashSet<u32> = assignments.iter().map(|a| a.plot).collect();
    assert_eq!(plots.len(), 36);
    assert_eq!(plots.iter().min(), Some(&1));
    assert_eq!(plots.iter().max(), Some(&36));

    for code in 1..=9u32 {
        let count = assignments
            .iter()
            .filter(|a| a.treatment.code == code)
            .count();
        assert_eq!(count, 4);
    }
}

#[test]
fn rcbd_example_blocks_are_permutations_of_all_treatments() {
    let assignments = randomize_factorial(&nk_factorial(), 4, DesignKind::Rcbd, 42).unwrap();
    assert_eq!(assignments.len(), 36);

    for block in 1..=4u32 {
        let in_block: Vec<_> = assignments.iter().filter(|a| a.block == block).collect();
        assert_eq!(in_block.len(), 9);

        let mut codes: Vec<u32> = in_block.iter().map(|a| a.treatment.code).collect();
        codes.sort_unstable();
        assert_eq!(codes, (1..=9).collect::<Vec<u32>>());

        for (position, assignment) in in_block.iter().enumerate() {
            assert_eq!(assignment.plot, block * 100 + position as u32 + 1);
        }
    }

    // Frequency count across the whole table, treatment by treatment.
    for code in 1..=9u32 {
        let count = assignments
            .iter()
            .filter(|a| a.treatment.code == code)
            .count();
        assert_eq!(count, 4);
    }
}

#[test]
fn same_seed_reproduces_the_full_assignment() {
    for kind in [DesignKind::Crd, DesignKind::Rcbd] {
        let first = randomize_factorial(&nk_factorial(), 4, kind, 2024).unwrap();
        let second = randomize_factorial(&nk_factorial(), 4, kind, 2024).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn layout_maps_crd_assignment_onto_4_by_9_grid() {
    let assignments = randomize_factorial(&nk_factorial(), 4, DesignKind::Crd, 42).unwrap();
    let layout =
        FieldLayout::from_assignments(&assignments, 4, 9, LayoutOrder::RowMajor).unwrap();

    assert_eq!(layout.nrows(), 4);
    assert_eq!(layout.ncols(), 9);
    let placed: HashSet<u32> = layout.plots.iter().copied().collect();
    assert_eq!(placed, (1..=36).collect::<HashSet<u32>>());
}

#[test]
fn layout_rejects_grids_that_do_not_fit_the_plot_count() {
    let assignments = randomize_factorial(&nk_factorial(), 4, DesignKind::Crd, 42).unwrap();
    let result = FieldLayout::from_assignments(&assignments, 5, 9, LayoutOrder::RowMajor);
    assert!(matches!(result, Err(DesignError::ShapeMismatch { .. })));
}

#[test]
fn rcbd_layout_places_one_block_per_column() {
    let assignments = randomize_factorial(&nk_factorial(), 4, DesignKind::Rcbd, 42).unwrap();
    let layout =
        FieldLayout::from_assignments(&assignments, 9, 4, LayoutOrder::ColumnMajor).unwrap();

    for col in 0..4usize {
        for row in 0..9usize {
            let plot = layout.plots[(row, col)];
            assert_eq!(plot / 100, col as u32 + 1);
        }
    }
}

#[test]
fn exported_table_has_stable_columns_and_one_row_per_plot() {
    let factorial = nk_factorial();
    let assignments = randomize_factorial(&factorial, 4, DesignKind::Crd, 42).unwrap();

    let path = std::env::temp_dir().join(format!("fieldgen_table_{}.csv", std::process::id()));
    export::write_table(&path, &assignments, &factorial.factor_names()).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let header: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        header,
        vec!["plot", "block", "treatment_code", "treatment", "nitrogen", "potassium"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 36);
    assert_eq!(&rows[0][0], "1");
    // N200-K60 carries its factor levels in the trailing columns.
    let n200k60 = rows.iter().find(|r| &r[3] == "N200-K60").unwrap();
    assert_eq!(&n200k60[4], "200");
    assert_eq!(&n200k60[5], "60");

    std::fs::remove_file(&path).ok();
}

#[test]
fn zero_replicates_is_an_invalid_design() {
    let result = randomize_factorial(&nk_factorial(), 0, DesignKind::Crd, 42);
    assert!(matches!(result, Err(DesignError::InvalidDesign(_))));
}

#[test]
fn design_builder_rejects_duplicate_treatments() {
    let mut treatments = nk_factorial().treatments();
    treatments[3].name = treatments[0].name.clone();
    treatments[3].code = treatments[0].code;
    let result = DesignBuilder::default()
        .treatments(treatments)
        .reps(4)
        .kind(DesignKind::Rcbd)
        .build();
    assert!(matches!(result, Err(DesignError::DuplicateTreatmentId(_))));
}
