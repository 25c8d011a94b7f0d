use std::{
	ffi::OsString,
	fs::{self, File},
	io::{self, Write},
	path::{Path, PathBuf},
};

use digest_domain::vector;

use crate::{
	Error, Result,
	models::{ArchiveEntry, SimilarEntry},
};

/// Durable list of accepted papers. The whole document is rewritten on every append.
#[derive(Debug)]
pub struct ArchiveStore {
	path: PathBuf,
	entries: Vec<ArchiveEntry>,
}
impl ArchiveStore {
	/// Loads the archive at `path`. A missing or unreadable document starts an empty archive.
	pub fn open(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let entries = match load_entries(&path) {
			Ok(entries) => entries,
			Err(err) => {
				tracing::warn!(
					path = %path.display(),
					error = %err,
					"Archive could not be loaded. Starting empty."
				);

				Vec::new()
			},
		};

		tracing::info!(path = %path.display(), entries = entries.len(), "Archive opened.");

		Self { path, entries }
	}

	pub fn entries(&self) -> &[ArchiveEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Best match by cosine similarity, kept only at or above `threshold`.
	///
	/// On equal similarity the oldest entry wins. Entries whose embedding cannot be compared with
	/// `query` are ignored.
	pub fn nearest(&self, query: &[f32], threshold: f32) -> Option<SimilarEntry<'_>> {
		let mut best: Option<SimilarEntry<'_>> = None;

		for entry in &self.entries {
			let Some(similarity) = vector::cosine_similarity(query, &entry.embedding) else {
				continue;
			};

			if best.map(|current| similarity > current.similarity).unwrap_or(true) {
				best = Some(SimilarEntry { entry, similarity });
			}
		}

		best.filter(|found| found.similarity >= threshold)
	}

	/// Appends `entry` and persists the archive before returning.
	///
	/// The in-memory archive only keeps the entry when the write succeeded.
	pub fn append(&mut self, entry: ArchiveEntry) -> Result<()> {
		if entry.embedding.is_empty() {
			return Err(Error::InvalidArgument("Archive entry embedding is empty.".to_string()));
		}

		self.entries.push(entry);

		if let Err(err) = self.persist() {
			self.entries.pop();

			return Err(err);
		}

		Ok(())
	}

	fn persist(&self) -> Result<()> {
		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent).map_err(|err| io_error(parent, err))?;
		}

		let payload = serde_json::to_vec(&self.entries)?;
		let staging = staging_path(&self.path);

		write_synced(&staging, &payload).map_err(|err| io_error(&staging, err))?;
		fs::rename(&staging, &self.path).map_err(|err| io_error(&self.path, err))?;

		Ok(())
	}
}

fn load_entries(path: &Path) -> Result<Vec<ArchiveEntry>> {
	let raw = match fs::read(path) {
		Ok(raw) => raw,
		Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
		Err(err) => return Err(io_error(path, err)),
	};

	Ok(serde_json::from_slice(&raw)?)
}

fn write_synced(path: &Path, payload: &[u8]) -> io::Result<()> {
	let mut file = File::create(path)?;

	file.write_all(payload)?;
	file.sync_all()
}

fn staging_path(path: &Path) -> PathBuf {
	let mut name = OsString::from(path.as_os_str());

	name.push(".tmp");

	PathBuf::from(name)
}

fn io_error(path: &Path, source: io::Error) -> Error {
	Error::Io { path: path.to_path_buf(), source }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(title: &str, embedding: Vec<f32>) -> ArchiveEntry {
		ArchiveEntry {
			title: title.to_string(),
			summary: format!("{title} summary."),
			date: "2026-10-16".to_string(),
			embedding,
		}
	}

	fn store(entries: Vec<ArchiveEntry>) -> ArchiveStore {
		ArchiveStore { path: PathBuf::from("unused.json"), entries }
	}

	#[test]
	fn empty_archive_has_no_neighbour() {
		assert!(store(Vec::new()).nearest(&[1.0, 0.0], -1.0).is_none());
	}

	#[test]
	fn below_threshold_is_no_match() {
		let archive = store(vec![entry("Orthogonal", vec![0.0, 1.0])]);

		assert!(archive.nearest(&[1.0, 0.0], 0.3).is_none());
	}

	#[test]
	fn oldest_entry_wins_ties() {
		let archive = store(vec![
			entry("Older", vec![1.0, 0.0]),
			entry("Newer", vec![2.0, 0.0]),
			entry("Other", vec![0.0, 1.0]),
		]);
		let found = archive.nearest(&[1.0, 0.0], 0.3).expect("Expected a match.");

		assert_eq!(found.entry.title, "Older");
		assert!((found.similarity - 1.0).abs() < 1e-6);
	}

	#[test]
	fn mismatched_dimensions_are_skipped() {
		let archive = store(vec![entry("Wrong", vec![1.0, 0.0, 0.0]), entry("Right", vec![0.6, 0.8])]);
		let found = archive.nearest(&[1.0, 0.0], 0.3).expect("Expected a match.");

		assert_eq!(found.entry.title, "Right");
	}

	#[test]
	fn staging_path_appends_suffix() {
		assert_eq!(staging_path(Path::new("data/memory.json")), PathBuf::from("data/memory.json.tmp"));
	}
}
