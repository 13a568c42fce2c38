// Term-frequency vectors: loading frequency maps and turning them into
// normalized, filtered token weights.

pub mod frequency;
pub mod transform;
