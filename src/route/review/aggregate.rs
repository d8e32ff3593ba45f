//! Keeps a recipe's `averageRating` and `reviewCount` in step with its reviews.
//!
//! Every review write is followed by a [`recompute`], which re-reads all of the
//! recipe's reviews rather than adjusting the stored values incrementally.
//! Recomputes for one recipe are serialised, so the last one to run always
//! observes every write that preceded it.

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::store::{self, Store};

const DEFAULT_STRIPES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
	pub average: f64,
	pub count: i64,
}

impl Aggregate {
	/// The arithmetic mean and count of the ratings, or `None` if there are none.
	pub fn of(ratings: impl IntoIterator<Item = i16>) -> Option<Self> {
		let (sum, count) = ratings
			.into_iter()
			.fold((0i64, 0i64), |(sum, count), rating| {
				(sum + i64::from(rating), count + 1)
			});

		(count > 0).then(|| Self {
			average: sum as f64 / count as f64,
			count,
		})
	}
}

/// A fixed set of locks, one of which guards each recipe.
///
/// Distinct recipes may share a stripe, which only costs some waiting.
pub struct RatingLocks {
	stripes: Box<[Mutex<()>]>,
}

impl RatingLocks {
	pub fn new(stripes: usize) -> Self {
		Self {
			stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
		}
	}

	fn stripe(&self, recipe_id: Uuid) -> &Mutex<()> {
		let index = recipe_id.as_u128() % self.stripes.len() as u128;

		&self.stripes[index as usize]
	}
}

impl Default for RatingLocks {
	fn default() -> Self {
		Self::new(DEFAULT_STRIPES)
	}
}

/// Recomputes and stores the aggregate rating of a recipe from its reviews.
///
/// When the recipe has no reviews left, nothing is written and the previous
/// values remain in place.
pub async fn recompute(
	database: &dyn Store,
	locks: &RatingLocks,
	recipe_id: Uuid,
) -> store::Result<Option<Aggregate>> {
	let _guard = locks.stripe(recipe_id).lock().await;

	let reviews = database.reviews(recipe_id).await?;
	let Some(aggregate) = Aggregate::of(reviews.iter().map(|review| review.rating)) else {
		tracing::debug!(recipe = %recipe_id, "no reviews left, keeping previous rating");
		return Ok(None);
	};

	database
		.set_rating(recipe_id, aggregate.average, aggregate.count)
		.await?;

	Ok(Some(aggregate))
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_aggregate_mean() {
		assert_eq!(
			Aggregate::of([5]),
			Some(Aggregate {
				average: 5.0,
				count: 1
			})
		);
		assert_eq!(
			Aggregate::of([4, 5]),
			Some(Aggregate {
				average: 4.5,
				count: 2
			})
		);
		assert_eq!(Aggregate::of([]), None);
	}

	#[test]
	fn test_stripes_are_stable() {
		let locks = RatingLocks::new(8);
		let id = Uuid::new_v4();

		assert!(std::ptr::eq(locks.stripe(id), locks.stripe(id)));
		assert_eq!(RatingLocks::new(0).stripes.len(), 1);
	}
}
