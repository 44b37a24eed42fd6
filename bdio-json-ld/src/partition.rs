//! Greedy, weight-bounded batching of wire nodes into archive entries.

use serde_json::Value as JsonValue;

/// Estimated cost of any JSON number.
const NUMBER_WEIGHT: usize = 8;

/// Approximate the serialized size of `value` without encoding it.
///
/// Strings assume one byte per character. `depth` is the nesting level of
/// `value` and only shows up in trace output.
pub fn estimate_weight(value: &JsonValue, depth: usize) -> usize {
    let weight = match value {
        JsonValue::Null => 4,
        JsonValue::Bool(true) => 4,
        JsonValue::Bool(false) => 5,
        JsonValue::Number(_) => NUMBER_WEIGHT,
        JsonValue::String(s) => 2 + s.len(),
        // "[" "]" plus a delimiter per element
        JsonValue::Array(items) => {
            2 + items.len()
                + items
                    .iter()
                    .map(|item| estimate_weight(item, depth + 1))
                    .sum::<usize>()
        }
        // "{" "}" plus ":" "," and a space per entry
        JsonValue::Object(map) => {
            2 + 3 * map.len()
                + map
                    .iter()
                    .map(|(k, v)| 2 + k.len() + estimate_weight(v, depth + 1))
                    .sum::<usize>()
        }
    };
    if depth == 0 {
        tracing::trace!(weight, "estimated node weight");
    }
    weight
}

/// A run of nodes written as one entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    nodes: Vec<JsonValue>,
    weight: usize,
}

impl Batch {
    pub fn nodes(&self) -> &[JsonValue] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<JsonValue> {
        self.nodes
    }

    /// Sum of the estimated weights of the nodes, including separators
    pub fn weight(&self) -> usize {
        self.weight
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Accumulates nodes into batches whose weight stays within a budget.
///
/// A node is added to the current batch unless that would push the batch
/// over the budget, in which case the current batch is closed first. A node
/// heavier than the whole budget therefore always ends up alone in its
/// batch. Order is preserved.
#[derive(Debug)]
pub struct Partitioner {
    budget: usize,
    separator: usize,
    current: Batch,
}

impl Partitioner {
    pub fn new(max_weight: usize) -> Self {
        Self {
            budget: max_weight,
            separator: 0,
            current: Batch::default(),
        }
    }

    /// Reserve `overhead` of every batch for entry framing and charge
    /// `separator` per node.
    pub fn with_framing(mut self, overhead: usize, separator: usize) -> Self {
        self.budget = self.budget.saturating_sub(overhead);
        self.separator = separator;
        self
    }

    /// Weight available to the nodes of one batch
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Add a node; returns the batch it closed, if any.
    pub fn push(&mut self, node: JsonValue) -> Option<Batch> {
        let weight = estimate_weight(&node, 0) + self.separator;
        let closed = if !self.current.is_empty() && self.current.weight + weight > self.budget {
            Some(std::mem::take(&mut self.current))
        } else {
            None
        };
        self.current.nodes.push(node);
        self.current.weight += weight;
        if let Some(batch) = &closed {
            tracing::debug!(nodes = batch.len(), weight = batch.weight, "closed batch");
        }
        closed
    }

    /// Close the current batch early; `None` if it is empty.
    pub fn flush(&mut self) -> Option<Batch> {
        if self.current.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.current))
    }

    /// The final batch, if any nodes remain.
    pub fn finish(mut self) -> Option<Batch> {
        self.flush()
    }
}

/// Split `nodes` into batches of at most `max_weight` (oversized single
/// nodes excepted).
pub fn partition(nodes: impl IntoIterator<Item = JsonValue>, max_weight: usize) -> Vec<Batch> {
    let mut partitioner = Partitioner::new(max_weight);
    let mut batches: Vec<Batch> = nodes
        .into_iter()
        .filter_map(|node| partitioner.push(node))
        .collect();
    batches.extend(partitioner.finish());
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_estimate_weight() {
        assert_eq!(estimate_weight(&json!("abc"), 0), 5);
        assert_eq!(estimate_weight(&json!(12345), 0), 8);
        assert_eq!(estimate_weight(&json!(null), 0), 4);
        assert_eq!(estimate_weight(&json!(false), 0), 5);
        assert_eq!(estimate_weight(&json!([]), 0), 2);
        assert_eq!(estimate_weight(&json!(["a", "b"]), 0), 2 + 2 + 3 + 3);
        assert_eq!(estimate_weight(&json!({"k": "v"}), 0), 2 + 3 + 3 + 3);
    }

    #[test]
    fn test_estimate_is_close_to_actual() {
        let node = json!({
            "@id": "http://example.com/foo",
            "@type": ["File"],
            "path": "./foo/bar",
            "size": 10
        });
        let actual = serde_json::to_string(&node).unwrap().len();
        let estimate = estimate_weight(&node, 0);
        assert!(estimate >= actual, "{} < {}", estimate, actual);
        assert!(estimate < actual * 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(partition(Vec::new(), 100).is_empty());
    }

    #[test]
    fn test_partition_preserves_order_and_bounds() {
        let nodes: Vec<JsonValue> = (0..50).map(|i| json!({"n": format!("node-{}", i)})).collect();
        let max = 60;
        let batches = partition(nodes.clone(), max);

        let flattened: Vec<JsonValue> = batches.iter().flat_map(|b| b.nodes().to_vec()).collect();
        assert_eq!(flattened, nodes);
        for batch in &batches {
            assert!(!batch.is_empty());
            assert!(batch.weight() <= max || batch.len() == 1);
        }
        assert!(batches.len() > 1);
    }

    #[test]
    fn test_oversized_node_is_alone() {
        let small = json!("s");
        let big = json!("x".repeat(100));
        let batches = partition(vec![small.clone(), big.clone(), small.clone()], 20);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1].nodes(), &[big]);
        assert_eq!(batches[1].weight(), 102);
    }

    #[test]
    fn test_batch_closes_when_full() {
        // each string weighs 10
        let node = json!("12345678");
        let batches = partition(vec![node.clone(); 4], 20);
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 2 && b.weight() == 20));
    }

    #[test]
    fn test_framing() {
        let mut partitioner = Partitioner::new(40).with_framing(20, 1);
        assert_eq!(partitioner.budget(), 20);
        // 9 + 1 per node
        assert!(partitioner.push(json!("1234567")).is_none());
        assert!(partitioner.push(json!("1234567")).is_none());
        let closed = partitioner.push(json!("1234567")).unwrap();
        assert_eq!(closed.weight(), 20);
        assert_eq!(partitioner.finish().unwrap().len(), 1);
    }
}
