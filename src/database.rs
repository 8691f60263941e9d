use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::{fs, sync::RwLock};

use crate::services::response::ServiceResult;

/// A record kept in one of the JSON collections.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
	/// Collection name, also the stem of the backing file.
	const COLLECTION: &'static str;

	fn id(&self) -> &str;
}

/// What a collection file holds: the records we could decode, plus entries
/// that did not fit the record shape. The latter are never served, but they
/// are written back untouched so a save does not erase them.
struct Collection<R> {
	records: Vec<R>,
	unreadable: Vec<Value>,
}

impl<R> Default for Collection<R> {
	fn default() -> Self {
		Self {
			records: Vec::new(),
			unreadable: Vec::new(),
		}
	}
}

/// JSON file backed collection with an in-memory cache.
///
/// Every save rewrites the whole file. Saves from this process are serialized
/// by the write lock, but another process writing the same file races with us
/// and the last writer wins.
pub struct RecordStore<R: Record> {
	path: PathBuf,
	collection: RwLock<Collection<R>>,
}

impl<R: Record> RecordStore<R> {
	pub async fn open(data_dir: impl AsRef<Path>) -> Self {
		let path = data_dir.as_ref().join(format!("{}.json", R::COLLECTION));
		let collection = read_collection(&path).await;
		Self {
			path,
			collection: RwLock::new(collection),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads the collection from disk without touching the cache.
	pub async fn load(&self) -> Vec<R> {
		read_collection(&self.path).await.records
	}

	/// Replaces the cache with what is currently on disk.
	pub async fn refresh(&self) {
		let collection = read_collection(&self.path).await;
		*self.collection.write().await = collection;
	}

	pub async fn snapshot(&self) -> Vec<R> {
		self.collection.read().await.records.clone()
	}

	pub async fn find(
		&self,
		id: &str,
	) -> Option<R> {
		self.collection.read().await.records.iter().find(|record| record.id() == id).cloned()
	}

	/// Overwrites the backing file and the cache with `records`.
	pub async fn save(
		&self,
		records: Vec<R>,
	) -> ServiceResult<()> {
		let mut cache = self.collection.write().await;
		write_collection(&self.path, &records, &cache.unreadable).await?;
		cache.records = records;
		Ok(())
	}

	/// Applies `change` to the cached collection and persists the result.
	///
	/// Nothing changes when `change` fails. When the write itself fails the
	/// cache keeps the change and disk stays behind until the next successful save.
	pub async fn mutate<T, F>(
		&self,
		change: F,
	) -> ServiceResult<T>
	where
		F: FnOnce(&mut Vec<R>) -> ServiceResult<T>,
	{
		let mut cache = self.collection.write().await;
		let mut draft = cache.records.clone();
		let output = change(&mut draft)?;
		cache.records = draft;
		write_collection(&self.path, &cache.records, &cache.unreadable).await?;
		Ok(output)
	}
}

async fn read_collection<R: Record>(path: &Path) -> Collection<R> {
	let raw = match fs::read_to_string(path).await {
		Ok(raw) => raw,
		Err(err) if err.kind() == ErrorKind::NotFound => {
			tracing::warn!("{} missing, starting with an empty {} collection", path.display(), R::COLLECTION);
			return Collection::default();
		}
		Err(err) => {
			tracing::warn!("Error reading {}: {}", path.display(), err);
			return Collection::default();
		}
	};

	if raw.trim().is_empty() {
		return Collection::default();
	}

	let entries: Vec<Value> = match serde_json::from_str(&raw) {
		Ok(entries) => entries,
		Err(err) => {
			tracing::warn!("{} is not a valid {} collection: {}", path.display(), R::COLLECTION, err);
			return Collection::default();
		}
	};

	// One odd entry must not cost us the rest of the file.
	let mut collection = Collection::default();
	for (index, entry) in entries.into_iter().enumerate() {
		match R::deserialize(&entry) {
			Ok(record) => collection.records.push(record),
			Err(err) => {
				tracing::warn!("Skipping entry {} of {}, kept on disk as is: {}", index, path.display(), err);
				collection.unreadable.push(entry);
			}
		}
	}
	collection
}

async fn write_collection<R: Record>(
	path: &Path,
	records: &[R],
	unreadable: &[Value],
) -> ServiceResult<()> {
	let mut entries = records.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>()?;
	entries.extend(unreadable.iter().cloned());
	let body = serde_json::to_vec_pretty(&entries)?;

	// Write next to the target and rename so readers never see a half written file.
	let mut staging = path.as_os_str().to_owned();
	staging.push(".tmp");
	fs::write(&staging, body).await?;
	fs::rename(&staging, path).await?;

	tracing::debug!("Saved {} {} records to {}", records.len(), R::COLLECTION, path.display());
	Ok(())
}

#[cfg(test)]
mod tests {
	use serde::{Deserialize, Serialize};
	use tempfile::tempdir;

	use super::{Record, RecordStore};
	use crate::services::response::ServiceError;

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	struct Note {
		id: String,
		body: String,
	}

	impl Record for Note {
		const COLLECTION: &'static str = "notes";
		fn id(&self) -> &str {
			&self.id
		}
	}

	fn note(
		id: &str,
		body: &str,
	) -> Note {
		Note {
			id: id.into(),
			body: body.into(),
		}
	}

	#[tokio::test]
	async fn test_save_then_load_round_trip() {
		let dir = tempdir().unwrap();
		let store = RecordStore::<Note>::open(dir.path()).await;
		let notes = vec![note("1", "first"), note("2", "second")];

		store.save(notes.clone()).await.unwrap();

		assert_eq!(store.load().await, notes);
		assert_eq!(RecordStore::<Note>::open(dir.path()).await.snapshot().await, notes);
	}

	#[tokio::test]
	async fn test_missing_file_loads_empty() {
		let dir = tempdir().unwrap();
		let store = RecordStore::<Note>::open(dir.path()).await;
		assert!(store.snapshot().await.is_empty());
		assert!(!store.path().exists());
	}

	#[tokio::test]
	async fn test_invalid_file_loads_empty() {
		let dir = tempdir().unwrap();
		std::fs::write(dir.path().join("notes.json"), "{ not json").unwrap();
		let store = RecordStore::<Note>::open(dir.path()).await;
		assert!(store.snapshot().await.is_empty());

		std::fs::write(dir.path().join("notes.json"), "   ").unwrap();
		store.refresh().await;
		assert!(store.snapshot().await.is_empty());
	}

	#[tokio::test]
	async fn test_refresh_picks_up_external_writes() {
		let dir = tempdir().unwrap();
		let store = RecordStore::<Note>::open(dir.path()).await;
		std::fs::write(dir.path().join("notes.json"), r#"[{"id":"9","body":"from elsewhere"}]"#).unwrap();

		assert!(store.find("9").await.is_none());
		store.refresh().await;
		assert_eq!(store.find("9").await, Some(note("9", "from elsewhere")));
	}

	#[tokio::test]
	async fn test_failed_change_is_not_persisted() {
		let dir = tempdir().unwrap();
		let store = RecordStore::<Note>::open(dir.path()).await;
		store.save(vec![note("1", "kept")]).await.unwrap();

		let result: Result<(), _> = store
			.mutate(|notes| {
				notes.clear();
				Err(ServiceError::validation("rejected"))
			})
			.await;

		assert!(result.is_err());
		assert_eq!(store.load().await, vec![note("1", "kept")]);
		assert_eq!(store.snapshot().await, vec![note("1", "kept")]);
	}

	#[tokio::test]
	async fn test_last_writer_wins_between_stores() {
		let dir = tempdir().unwrap();
		let first = RecordStore::<Note>::open(dir.path()).await;
		let second = RecordStore::<Note>::open(dir.path()).await;

		first
			.mutate(|notes| {
				notes.push(note("1", "from first"));
				Ok(())
			})
			.await
			.unwrap();
		second
			.mutate(|notes| {
				notes.push(note("2", "from second"));
				Ok(())
			})
			.await
			.unwrap();

		assert_eq!(first.load().await, vec![note("2", "from second")]);
	}

	#[tokio::test]
	async fn test_odd_entry_does_not_hide_or_erase_the_rest() {
		let dir = tempdir().unwrap();
		let file = dir.path().join("notes.json");
		std::fs::write(&file, r#"[{"id":"1","body":"fine"},{"id":"2","body":42},{"id":"3","body":"also fine"}]"#).unwrap();
		let store = RecordStore::<Note>::open(dir.path()).await;

		assert_eq!(store.snapshot().await, vec![note("1", "fine"), note("3", "also fine")]);
		assert!(store.find("2").await.is_none());

		store
			.mutate(|notes| {
				notes.push(note("4", "new"));
				Ok(())
			})
			.await
			.unwrap();

		let on_disk: Vec<serde_json::Value> = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
		let ids: Vec<&str> = on_disk.iter().map(|entry| entry["id"].as_str().unwrap()).collect();
		assert_eq!(ids, vec!["1", "3", "4", "2"]);
		assert_eq!(on_disk[3], serde_json::json!({ "id": "2", "body": 42 }));
		assert_eq!(store.load().await.len(), 3);
	}
}
