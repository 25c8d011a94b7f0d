/// Cosine of the angle between `query` and `other`.
///
/// `None` when the lengths differ or either vector is empty or has zero norm.
pub fn cosine_similarity(query: &[f32], other: &[f32]) -> Option<f32> {
	if query.is_empty() || query.len() != other.len() {
		return None;
	}

	let (dot, query_sq, other_sq) = query
		.iter()
		.zip(other)
		.fold((0.0_f32, 0.0_f32, 0.0_f32), |(dot, q, o), (a, b)| (dot + a * b, q + a * a, o + b * b));
	let norm = (query_sq * other_sq).sqrt();

	(query_sq > f32::EPSILON && other_sq > f32::EPSILON).then(|| (dot / norm).clamp(-1.0, 1.0))
}

/// Element-wise mean. `None` for an empty set or mismatched dimensions.
pub fn mean_pool(vectors: &[Vec<f32>]) -> Option<Vec<f32>> {
	let first = vectors.first()?;
	let dim = first.len();

	if dim == 0 || vectors.iter().any(|vec| vec.len() != dim) {
		return None;
	}

	let mut out = vec![0.0_f32; dim];

	for vec in vectors {
		for (idx, value) in vec.iter().enumerate() {
			out[idx] += value;
		}
	}

	let count = vectors.len() as f32;

	for value in &mut out {
		*value /= count;
	}

	Some(out)
}
