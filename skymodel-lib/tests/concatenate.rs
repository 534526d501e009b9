use skymodel_core::{CatalogTable, ColumnId};
use skymodel_format::{read_skymodel, read_skymodel_file, write_skymodel_file};
use skymodel_lib::{ConcatenateOptions, KeepMatches, MatchBy, concatenate};
use tempfile::TempDir;

fn model(rows: &str) -> CatalogTable {
    read_skymodel(&format!(
        "FORMAT = Name, Type, Ra, Dec, I, SpectralIndex\n\n{rows}"
    ))
    .unwrap()
}

fn patched(rows: &str) -> CatalogTable {
    read_skymodel(&format!(
        "FORMAT = Name, Type, Patch, Ra, Dec, I\n\n{rows}"
    ))
    .unwrap()
}

fn unspectral(rows: &str) -> CatalogTable {
    read_skymodel(&format!("FORMAT = Name, Type, Ra, Dec, I\n\n{rows}")).unwrap()
}

fn names(table: &CatalogTable) -> Vec<&str> {
    table.names().into_iter().map(|n| n.unwrap_or("")).collect()
}

fn by_name(keep: KeepMatches) -> ConcatenateOptions {
    ConcatenateOptions {
        match_by: MatchBy::Name,
        keep,
        ..Default::default()
    }
}

fn by_position(radius: f64, keep: KeepMatches) -> ConcatenateOptions {
    ConcatenateOptions {
        match_by: MatchBy::Position,
        radius,
        keep,
    }
}

#[test]
fn name_match_keeps_first_and_takes_spectrum_from_second() {
    let mut cat1 = model("A, POINT, 10.0, 20.0, 1.0, [-0.7]\nB, POINT, 11.0, 20.0, 2.0, [-0.5]\n");
    let cat2 = model("B, POINT, 11.0, 20.0, 3.0, [-0.9, 0.1]\nC, POINT, 12.0, 20.0, 4.0\n");

    let summary = concatenate(&mut cat1, &cat2, &by_name(KeepMatches::From1)).unwrap();
    assert_eq!(names(&cat1), vec!["A", "B", "C"]);
    assert_eq!(summary.appended, 2);
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.renamed, 0);

    // Surviving B is catalog 1's row, but its spectrum comes from catalog 2
    assert_eq!(cat1.floats(ColumnId::I).unwrap()[1], Some(2.0));
    let spectral = cat1.lists(ColumnId::SpectralIndex).unwrap();
    assert_eq!(spectral[0], vec![-0.7, 0.0]);
    assert_eq!(spectral[1], vec![-0.9, 0.1]);
    assert_eq!(spectral[2], vec![0.0, 0.0]);
    assert_eq!(cat1.column_index(ColumnId::SpectralIndex), Some(5));
}

#[test]
fn spectrum_kept_when_second_catalog_has_none() {
    let mut cat1 = model("A, POINT, 10.0, 20.0, 1.0, [-0.7]\nB, POINT, 11.0, 20.0, 2.0, [-0.5, 0.2]\n");
    let cat2 = unspectral("B, POINT, 11.0, 20.0, 3.0\nC, POINT, 12.0, 20.0, 4.0\n");

    concatenate(&mut cat1, &cat2, &by_name(KeepMatches::From1)).unwrap();
    assert_eq!(names(&cat1), vec!["A", "B", "C"]);
    let spectral = cat1.lists(ColumnId::SpectralIndex).unwrap();
    assert_eq!(spectral[0], vec![-0.7, 0.0]);
    assert_eq!(spectral[1], vec![-0.5, 0.2]);
    assert_eq!(spectral[2], vec![0.0, 0.0]);
}

#[test]
fn keep_from2_drops_first_occurrence() {
    let mut cat1 = model("A, POINT, 10.0, 20.0, 1.0\nB, POINT, 11.0, 20.0, 2.0\n");
    let cat2 = model("B, POINT, 11.0, 20.0, 3.0\nC, POINT, 12.0, 20.0, 4.0\n");

    concatenate(&mut cat1, &cat2, &by_name(KeepMatches::From2)).unwrap();
    assert_eq!(names(&cat1), vec!["A", "B", "C"]);
    assert_eq!(cat1.floats(ColumnId::I).unwrap()[1], Some(3.0));
}

#[test]
fn keep_from2_only_removes_one_of_three() {
    let mut cat1 = model("X, POINT, 10.0, 20.0, 1.0\n");
    let cat2 = model("X, POINT, 11.0, 20.0, 2.0\nX, POINT, 12.0, 20.0, 3.0\n");

    let summary = concatenate(&mut cat1, &cat2, &by_name(KeepMatches::From2)).unwrap();
    assert_eq!(summary.removed, 1);
    assert_eq!(names(&cat1), vec!["X_1", "X_2"]);
    assert_eq!(cat1.floats(ColumnId::I).unwrap(), &[Some(2.0), Some(3.0)]);
}

#[test]
fn keep_all_renames_shared_name() {
    let mut cat1 = model("X, POINT, 10.0, 20.0, 1.0\n");
    let cat2 = model("X, POINT, 50.0, -20.0, 1.0\nY, POINT, 51.0, -20.0, 1.0\n");

    let summary = concatenate(&mut cat1, &cat2, &by_name(KeepMatches::All)).unwrap();
    assert_eq!(names(&cat1), vec!["X_1", "X_2", "Y"]);
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.renamed, 2);
}

#[test]
fn third_occurrence_is_not_renamed() {
    let mut cat1 = model("X, POINT, 10.0, 20.0, 1.0\nX, POINT, 11.0, 20.0, 1.0\n");
    let cat2 = model("X, POINT, 12.0, 20.0, 1.0\n");

    concatenate(&mut cat1, &cat2, &by_name(KeepMatches::All)).unwrap();
    assert_eq!(names(&cat1), vec!["X_1", "X_2", "X"]);
}

#[test]
fn position_match_within_radius() {
    let mut cat1 = model("A, POINT, 10.0, 20.0, 1.0\n");
    // ~9 arcsec and 30 arcsec away
    let cat2 = model(&format!(
        "near, POINT, 10.0027, 20.0, 2.0\nfar, POINT, 10.0, {}, 3.0\n",
        20.0 + 30.0 / 3600.0
    ));

    let summary =
        concatenate(&mut cat1, &cat2, &by_position(10.0 / 3600.0, KeepMatches::From1)).unwrap();
    assert_eq!(summary.removed, 1);
    assert_eq!(names(&cat1), vec!["A", "far"]);
}

#[test]
fn position_match_keep_from2() {
    let mut cat1 = model("A, POINT, 10.0, 20.0, 1.0\nB, POINT, 40.0, 20.0, 1.0\n");
    let cat2 = model("A2, POINT, 10.0027, 20.0, 2.0\n");

    concatenate(&mut cat1, &cat2, &by_position(10.0 / 3600.0, KeepMatches::From2)).unwrap();
    assert_eq!(names(&cat1), vec!["B", "A2"]);
}

#[test]
fn negative_radius_matches_nothing() {
    let mut cat1 = model("A, POINT, 10.0, 20.0, 1.0\n");
    let cat2 = model("A2, POINT, 10.0, 20.0, 2.0\n");

    let summary = concatenate(&mut cat1, &cat2, &by_position(-1.0, KeepMatches::From1)).unwrap();
    assert_eq!(summary.removed, 0);
    assert_eq!(cat1.row_count(), 2);
}

#[test]
fn merged_patches_each_have_one_position() {
    let mut cat1 = patched("a, POINT, p1, 10.0, 20.0, 1.0\nb, POINT, p1, 12.0, 22.0, 1.0\n");
    let cat2 = patched("c, POINT, p2, 50.0, -10.0, 1.0\nd, POINT, p1, 14.0, 24.0, 1.0\n");

    concatenate(&mut cat1, &cat2, &by_name(KeepMatches::All)).unwrap();
    let patches = cat1.texts(ColumnId::Patch).unwrap();
    for patch in patches.iter().flatten() {
        assert!(cat1.meta.patch_positions.contains_key(patch));
    }
    assert_eq!(cat1.meta.patch_positions.len(), 2);

    // Midpoint of the RA and Dec extents of p1's members
    let (ra, dec) = cat1.meta.patch_positions["p1"];
    assert!((ra - 12.0).abs() < 1e-9);
    assert!((dec - 22.0).abs() < 1e-9);
}

#[test]
fn unpatched_second_catalog_is_grouped() {
    let mut cat1 = patched("a, POINT, p1, 10.0, 20.0, 1.0\n");
    let cat2 = model("b, POINT, 30.0, 40.0, 1.0\n");

    concatenate(&mut cat1, &cat2, &ConcatenateOptions::default()).unwrap();
    let patches = cat1.texts(ColumnId::Patch).unwrap();
    assert_eq!(patches[1].as_deref(), Some("Patch"));
    assert_eq!(cat1.meta.patch_positions["Patch"], (30.0, 40.0));
}

#[test]
fn patched_second_catalog_is_ungrouped() {
    let mut cat1 = model("a, POINT, 10.0, 20.0, 1.0\n");
    let cat2 = patched("b, POINT, p1, 30.0, 40.0, 1.0\n");

    concatenate(&mut cat1, &cat2, &ConcatenateOptions::default()).unwrap();
    assert!(!cat1.has_patches());
    assert!(cat1.meta.patch_positions.is_empty());
    assert_eq!(cat1.row_count(), 2);
}

#[test]
fn merged_model_round_trips_through_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("merged.sky");

    let mut cat1 = patched("a, POINT, p1, 10.0, 20.0, 1.0\n");
    let cat2 = patched("a, POINT, p2, 30.0, 40.0, 2.0\n");
    concatenate(&mut cat1, &cat2, &by_name(KeepMatches::All)).unwrap();
    write_skymodel_file(&cat1, &path).unwrap();

    let back = read_skymodel_file(&path).unwrap();
    assert_eq!(names(&back), vec!["a_1", "a_2"]);
    assert_eq!(back.meta.patch_positions.len(), 2);
}
