//! Frequently sold properties

use crate::pipeline::filter::FilteredView;
use crate::pipeline::types::PropertyFrequency;
use std::collections::HashMap;

/// Properties with the most sales, descending
/// Ties keep the order in which properties first appear in the view
pub fn top_properties(view: &FilteredView<'_>, n: usize) -> Vec<PropertyFrequency> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<PropertyFrequency> = Vec::new();

    for record in view.iter() {
        match index.get(record.property_id.as_str()) {
            Some(&i) => counts[i].sale_count += 1,
            None => {
                index.insert(record.property_id.as_str(), counts.len());
                counts.push(PropertyFrequency {
                    property_id: record.property_id.clone(),
                    sale_count: 1,
                });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.sale_count.cmp(&a.sale_count));
    counts.truncate(n);
    counts
}
