use std::{
	env, fs, io,
	path::{Path, PathBuf},
};

use uuid::Uuid;

/// A unique archive location under the system temp directory, removed on drop.
pub struct TempArchive {
	dir: PathBuf,
	path: PathBuf,
}
impl TempArchive {
	pub fn new() -> Self {
		let dir = env::temp_dir().join(format!("digest_test_{}", Uuid::new_v4().simple()));
		let path = dir.join("paper_memory.json");

		Self { dir, path }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Writes raw bytes at the archive location, for seeding corrupt or legacy documents.
	pub fn write_raw(&self, contents: impl AsRef<[u8]>) -> io::Result<()> {
		fs::create_dir_all(&self.dir)?;
		fs::write(&self.path, contents)
	}

	pub fn read_raw(&self) -> io::Result<String> {
		fs::read_to_string(&self.path)
	}
}
impl Default for TempArchive {
	fn default() -> Self {
		Self::new()
	}
}
impl Drop for TempArchive {
	fn drop(&mut self) {
		if let Err(err) = fs::remove_dir_all(&self.dir)
			&& err.kind() != io::ErrorKind::NotFound
		{
			eprintln!("Test archive cleanup failed: {err}.");
		}
	}
}
