use super::*;

fn col(v: &[&str]) -> FormattedColumn { v.iter().map(|s| s.to_string()).collect() }

#[test]
fn bordered_table() {
    let cols = vec![col(&[" ID  ", "   0 ", "*  1 "]), col(&[" NAME ", "      ", " EMP  "])];
    let lines = assemble(&cols, "3956160932").unwrap();
    assert_eq!(
        lines,
        vec![
            "Plan hash value: 3956160932",
            "",
            "--------------",
            "| ID  | NAME |",
            "--------------",
            "|   0 |      |",
            "|*  1 | EMP  |",
            "--------------",
        ]
    );
}

#[test]
fn border_width_is_sum_of_columns_plus_separators() {
    let widths = [5usize, 20, 7, 9, 13];
    let cols: Vec<FormattedColumn> = widths.iter().map(|w| vec![" ".repeat(*w); 4]).collect();
    let lines = assemble(&cols, "1").unwrap();
    let expected = widths.iter().sum::<usize>() + widths.len() + 1;
    assert_eq!(lines[2].len(), expected);
    for line in &lines[2..] {
        assert_eq!(line.chars().count(), expected, "{:?}", line);
    }
}

#[test]
fn header_only_table() {
    let lines = assemble(&[col(&[" ID "]), col(&[" OPERATION "])], "").unwrap();
    assert_eq!(lines, vec!["Plan hash value: ", "", "------------------", "| ID | OPERATION |", "------------------", "------------------"]);
}

#[test]
fn mismatched_column_lengths_fail() {
    let cols = vec![col(&[" A ", " 1 "]), col(&[" B "])];
    let err = assemble(&cols, "1").unwrap_err();
    assert_eq!(err, XplanError::formatting("column 1 has 1 cells, expected 2"));
}

#[test]
fn ragged_cell_width_fails() {
    let cols = vec![col(&[" A ", " 10 "])];
    assert!(matches!(assemble(&cols, "1"), Err(XplanError::Formatting(_))));
}

#[test]
fn no_columns_fails() {
    assert!(matches!(assemble(&[], "1"), Err(XplanError::Formatting(_))));
}
