//! Serial-number assignment, grounded on `assign_serial_numbers`.

use voter_shield_common::VoterRecord;

/// Groups `records` by `doc_id`, assigns a dense 1-based `serial_no` within
/// each group ordered by `page_no` (ties keep their incoming relative
/// order, which is already `(page_no, intra_page_index)` because records
/// are produced top-to-bottom from the stacked image), then returns the
/// full list sorted by `(doc_id, serial_no)`.
#[must_use]
pub fn assign_serial_numbers(mut records: Vec<VoterRecord>) -> Vec<VoterRecord> {
    records.sort_by(|a, b| a.doc_id.cmp(&b.doc_id).then(a.page_no.cmp(&b.page_no)));

    let mut counters: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
    for record in &mut records {
        let counter = counters.entry(record.doc_id.clone()).or_insert(0);
        *counter += 1;
        record.serial_no = *counter;
    }

    records.sort_by(|a, b| a.doc_id.cmp(&b.doc_id).then(a.serial_no.cmp(&b.serial_no)));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(doc_id: &str, page_no: u32, intra: u32) -> VoterRecord {
        VoterRecord {
            doc_id: doc_id.to_string(),
            page_no,
            intra_page_index: intra,
            ..Default::default()
        }
    }

    #[test]
    fn serial_numbers_are_dense_and_reset_per_document() {
        let records = vec![record("a", 1, 1), record("a", 1, 2), record("b", 1, 1)];
        let assigned = assign_serial_numbers(records);
        let a_serials: Vec<u32> = assigned.iter().filter(|r| r.doc_id == "a").map(|r| r.serial_no).collect();
        let b_serials: Vec<u32> = assigned.iter().filter(|r| r.doc_id == "b").map(|r| r.serial_no).collect();
        assert_eq!(a_serials, vec![1, 2]);
        assert_eq!(b_serials, vec![1]);
    }

    #[test]
    fn preserves_within_page_order_which_is_already_intra_page_order() {
        let records = vec![record("a", 2, 1), record("a", 1, 1), record("a", 1, 2)];
        let assigned = assign_serial_numbers(records);
        let pages: Vec<(u32, u32)> = assigned.iter().map(|r| (r.page_no, r.serial_no)).collect();
        assert_eq!(pages, vec![(1, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn final_list_is_sorted_by_doc_id_then_serial_no() {
        let records = vec![record("b", 1, 1), record("a", 1, 1)];
        let assigned = assign_serial_numbers(records);
        let doc_ids: Vec<&str> = assigned.iter().map(|r| r.doc_id.as_str()).collect();
        assert_eq!(doc_ids, vec!["a", "b"]);
    }
}
