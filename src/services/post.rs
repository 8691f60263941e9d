use std::sync::Arc;

use crate::{
	common::id_generator::IdGenerator,
	database::RecordStore,
	domain::post::{
		commands::{CreatePost, ListPosts, UpdatePost},
		Post,
	},
	services::response::{ServiceError, ServiceResult},
};

/// Posts and their moderation workflow.
///
/// Every operation starts by reloading the collection from disk, so edits made
/// to posts.json by hand or by another process are picked up on the next request.
pub struct PostService {
	store: Arc<RecordStore<Post>>,
	ids: Arc<IdGenerator>,
}

impl PostService {
	pub fn new(
		store: Arc<RecordStore<Post>>,
		ids: Arc<IdGenerator>,
	) -> Self {
		Self { store, ids }
	}

	/// Published posts only, unless `include_all`, in storage order.
	pub async fn list(
		&self,
		query: ListPosts,
	) -> Vec<Post> {
		self.store.refresh().await;
		self.store
			.snapshot()
			.await
			.into_iter()
			.filter(|post| query.include_all || post.is_published())
			.skip(query.page.saturating_mul(query.page_size))
			.take(query.page_size)
			.collect()
	}

	pub async fn get(
		&self,
		id: &str,
	) -> ServiceResult<Post> {
		self.store.refresh().await;
		self.store.find(id).await.ok_or_else(|| ServiceError::not_found("Post", id))
	}

	pub async fn create(
		&self,
		cmd: CreatePost,
		image: Option<String>,
	) -> ServiceResult<Post> {
		let post = Post::submit(self.ids.next(), cmd, image)?;

		self.store.refresh().await;
		self.store
			.mutate(|posts| {
				posts.push(post.clone());
				Ok(())
			})
			.await?;

		tracing::info!("Post {} submitted for moderation", post.id);
		Ok(post)
	}

	pub async fn update(
		&self,
		id: &str,
		cmd: UpdatePost,
	) -> ServiceResult<Post> {
		self.store.refresh().await;
		let post = self
			.store
			.mutate(|posts| {
				let post = find_mut(posts, id)?;
				post.apply(cmd)?;
				Ok(post.clone())
			})
			.await?;

		tracing::info!("Post {} updated, status {}", post.id, post.status);
		Ok(post)
	}

	pub async fn delete(
		&self,
		id: &str,
	) -> ServiceResult<()> {
		self.store.refresh().await;
		self.store
			.mutate(|posts| {
				let before = posts.len();
				posts.retain(|post| post.id != id);
				if posts.len() == before {
					return Err(ServiceError::not_found("Post", id));
				}
				Ok(())
			})
			.await?;

		tracing::info!("Post {} deleted", id);
		Ok(())
	}

	/// Returns the new view count
	pub async fn increment_views(
		&self,
		id: &str,
	) -> ServiceResult<u64> {
		self.store.refresh().await;
		self.store
			.mutate(|posts| {
				let post = find_mut(posts, id)?;
				post.views = post.views.saturating_add(1);
				Ok(post.views)
			})
			.await
	}
}

fn find_mut<'a>(
	posts: &'a mut [Post],
	id: &str,
) -> ServiceResult<&'a mut Post> {
	posts.iter_mut().find(|post| post.id == id).ok_or_else(|| ServiceError::not_found("Post", id))
}

#[cfg(test)]
mod tests {
	use rand::Rng;
	use tempfile::{tempdir, TempDir};

	use super::*;
	use crate::domain::post::PostStatus;

	async fn service() -> (TempDir, PostService) {
		let dir = tempdir().unwrap();
		let store = Arc::new(RecordStore::open(dir.path()).await);
		(dir, PostService::new(store, Arc::new(IdGenerator::new())))
	}

	fn submission(title: &str) -> CreatePost {
		CreatePost {
			title: title.into(),
			content: "Body".into(),
			author: "Ana".into(),
			category: "general".into(),
		}
	}

	fn everything(
		page: usize,
		page_size: usize,
	) -> ListPosts {
		ListPosts {
			include_all: true,
			page,
			page_size,
		}
	}

	async fn publish(
		service: &PostService,
		id: &str,
	) -> Post {
		service
			.update(
				id,
				UpdatePost {
					status: Some("published".into()),
					..Default::default()
				},
			)
			.await
			.unwrap()
	}

	#[tokio::test]
	async fn test_create_starts_pending_with_no_views() {
		let (dir, service) = service().await;

		let post = service.create(submission("Hello"), Some("/assets/images/a.png".into())).await.unwrap();

		assert_eq!(post.status, PostStatus::Pending);
		assert_eq!(post.views, 0);
		assert_eq!(post.image.as_deref(), Some("/assets/images/a.png"));
		let on_disk = std::fs::read_to_string(dir.path().join("posts.json")).unwrap();
		assert!(on_disk.contains(&post.id));
	}

	#[tokio::test]
	async fn test_create_with_missing_field_persists_nothing() {
		let (dir, service) = service().await;
		let mut cmd = submission("Hello");
		cmd.category.clear();

		assert!(matches!(service.create(cmd, None).await, Err(ServiceError::Validation(_))));
		assert!(!dir.path().join("posts.json").exists());
	}

	#[tokio::test]
	async fn test_list_hides_unpublished_posts() {
		let (_dir, service) = service().await;
		let first = service.create(submission("one"), None).await.unwrap();
		service.create(submission("two"), None).await.unwrap();
		publish(&service, &first.id).await;

		let public = service.list(ListPosts::default()).await;
		assert_eq!(public.len(), 1);
		assert!(public.iter().all(|post| post.status == PostStatus::Published));

		assert_eq!(service.list(everything(0, 10)).await.len(), 2);
	}

	#[tokio::test]
	async fn test_pagination_boundaries() {
		let (_dir, service) = service().await;
		let mut ids = Vec::new();
		for n in 0..5 {
			ids.push(service.create(submission(&format!("post {n}")), None).await.unwrap().id);
		}

		let first_page: Vec<String> = service.list(everything(0, 2)).await.into_iter().map(|post| post.id).collect();
		assert_eq!(first_page, ids[..2].to_vec());

		let last_page: Vec<String> = service.list(everything(2, 2)).await.into_iter().map(|post| post.id).collect();
		assert_eq!(last_page, ids[4..].to_vec());

		assert!(service.list(everything(3, 2)).await.is_empty());
		assert!(service.list(everything(usize::MAX, 2)).await.is_empty());
	}

	#[tokio::test]
	async fn test_publishing_changes_only_status() {
		let (_dir, service) = service().await;
		let before = service.create(submission("Hello"), None).await.unwrap();

		let after = publish(&service, &before.id).await;

		assert_eq!(after.status, PostStatus::Published);
		assert_eq!(Post { status: PostStatus::Pending, ..after.clone() }, before);
		assert_eq!(service.get(&before.id).await.unwrap(), after);
	}

	#[tokio::test]
	async fn test_update_with_unknown_status_is_rejected() {
		let (_dir, service) = service().await;
		let post = service.create(submission("Hello"), None).await.unwrap();

		let result = service
			.update(
				&post.id,
				UpdatePost {
					status: Some("archived".into()),
					..Default::default()
				},
			)
			.await;

		assert!(matches!(result, Err(ServiceError::Validation(_))));
		assert_eq!(service.get(&post.id).await.unwrap(), post);
	}

	#[tokio::test]
	async fn test_update_missing_post() {
		let (_dir, service) = service().await;
		let result = service.update("nope", UpdatePost::default()).await;
		assert!(matches!(result, Err(ServiceError::NotFound { .. })));
	}

	#[tokio::test]
	async fn test_increment_views_adds_one_each_call() {
		'_given: {
			let (dir, service) = service().await;
			let post = service.create(submission("Hello"), None).await.unwrap();
			let start = rand::thread_rng().gen_range(1..1000u64);
			let raw = std::fs::read_to_string(dir.path().join("posts.json")).unwrap();
			let mut stored: Vec<Post> = serde_json::from_str(&raw).unwrap();
			stored[0].views = start;
			std::fs::write(dir.path().join("posts.json"), serde_json::to_string(&stored).unwrap()).unwrap();

			'_when: {
				let first = service.increment_views(&post.id).await.unwrap();
				let second = service.increment_views(&post.id).await.unwrap();

				'_then: {
					assert_eq!(first, start + 1);
					assert_eq!(second, start + 2);
					assert_eq!(service.get(&post.id).await.unwrap().views, start + 2);
				}
			}
		}
	}

	#[tokio::test]
	async fn test_increment_views_on_missing_post() {
		let (_dir, service) = service().await;
		assert!(matches!(service.increment_views("nope").await, Err(ServiceError::NotFound { .. })));
	}

	#[tokio::test]
	async fn test_delete() {
		let (_dir, service) = service().await;
		let post = service.create(submission("Hello"), None).await.unwrap();
		service.create(submission("Other"), None).await.unwrap();

		assert!(matches!(service.delete("nope").await, Err(ServiceError::NotFound { .. })));
		assert_eq!(service.list(everything(0, 10)).await.len(), 2);

		service.delete(&post.id).await.unwrap();
		assert_eq!(service.list(everything(0, 10)).await.len(), 1);
		assert!(matches!(service.get(&post.id).await, Err(ServiceError::NotFound { .. })));
	}

	#[tokio::test]
	async fn test_legacy_entries_survive_the_next_write() {
		let (dir, service) = service().await;
		let file = dir.path().join("posts.json");
		std::fs::write(
			&file,
			r#"[
				{"id":"1","title":"Kept","content":"b","author":"c","category":"d","status":"published","views":3,"date":"2024-05-01T10:00:00Z"},
				{"id":"2","title":"Archived","content":"b","author":"c","category":"d","status":"archived","views":1,"date":"2024-05-01T10:00:00Z"},
				{"id":"3","title":"Odd date","content":"b","author":"c","category":"d","status":"pending","date":"last tuesday"}
			]"#,
		)
		.unwrap();

		let listed = service.list(everything(0, 10)).await;
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].id, "1");

		service.create(submission("Fresh"), None).await.unwrap();
		service.increment_views("1").await.unwrap();

		let on_disk: Vec<serde_json::Value> = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
		assert_eq!(on_disk.len(), 4);
		assert!(on_disk.iter().any(|entry| entry["id"] == "1" && entry["views"] == 4));
		assert!(on_disk.iter().any(|entry| entry["id"] == "2" && entry["status"] == "archived"));
		assert!(on_disk.iter().any(|entry| entry["id"] == "3" && entry["date"] == "last tuesday"));
	}
}
