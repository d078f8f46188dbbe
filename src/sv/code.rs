use uuid::Uuid;

use crate::{
  entity::{discount_code, influencer, sale},
  prelude::*,
};

pub struct Code<'a> {
  db: &'a DatabaseConnection,
}

const GENERATE_ATTEMPTS: usize = 5;

/// Codes are case-insensitive: trimmed and upper-cased before every
/// store or comparison.
pub fn normalize(code: &str) -> String {
  code.trim().to_uppercase()
}

fn validate_pct(value: i32, what: &str) -> Result<()> {
  if (1..=100).contains(&value) {
    Ok(())
  } else {
    Err(Error::InvalidArgs(format!("{what} must be between 1 and 100")))
  }
}

impl<'a> Code<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    influencer_id: i64,
    code: Option<&str>,
    discount_pct: i32,
    commission_pct: i32,
    is_active: bool,
  ) -> Result<discount_code::Model> {
    validate_pct(discount_pct, "discount_pct")?;
    validate_pct(commission_pct, "commission_pct")?;

    influencer::Entity::find_by_id(influencer_id)
      .one(self.db)
      .await?
      .ok_or(Error::InfluencerNotFound)?;

    let code = match code {
      Some(raw) => {
        let normalized = normalize(raw);
        if normalized.is_empty() {
          return Err(Error::InvalidArgs("Code must not be empty".into()));
        }
        if self.exists(&normalized).await? {
          return Err(Error::CodeExists);
        }
        normalized
      }
      None => self.generate().await?,
    };

    let now = Utc::now().naive_utc();
    let model = discount_code::ActiveModel {
      id: NotSet,
      code: Set(code),
      influencer_id: Set(influencer_id),
      discount_pct: Set(discount_pct),
      commission_pct: Set(commission_pct),
      is_active: Set(is_active),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    info!(code = %model.code, influencer = influencer_id, "created discount code");
    Ok(model)
  }

  /// Admin approval: activates the code and finalizes both percentages.
  pub async fn approve(
    &self,
    code_id: i32,
    discount_pct: i32,
    commission_pct: i32,
  ) -> Result<discount_code::Model> {
    validate_pct(discount_pct, "discount_pct")?;
    validate_pct(commission_pct, "commission_pct")?;

    let code = discount_code::Entity::find_by_id(code_id)
      .one(self.db)
      .await?
      .ok_or(Error::CodeNotFound)?;

    Ok(
      discount_code::ActiveModel {
        discount_pct: Set(discount_pct),
        commission_pct: Set(commission_pct),
        is_active: Set(true),
        ..code.into()
      }
      .update(self.db)
      .await?,
    )
  }

  pub async fn update(
    &self,
    code_id: i32,
    discount_pct: Option<i32>,
    commission_pct: Option<i32>,
    is_active: Option<bool>,
  ) -> Result<discount_code::Model> {
    if let Some(pct) = discount_pct {
      validate_pct(pct, "discount_pct")?;
    }
    if let Some(pct) = commission_pct {
      validate_pct(pct, "commission_pct")?;
    }

    let code = discount_code::Entity::find_by_id(code_id)
      .one(self.db)
      .await?
      .ok_or(Error::CodeNotFound)?;

    if discount_pct.is_none() && commission_pct.is_none() && is_active.is_none()
    {
      return Ok(code);
    }

    let mut active: discount_code::ActiveModel = code.into();
    if let Some(pct) = discount_pct {
      active.discount_pct = Set(pct);
    }
    if let Some(pct) = commission_pct {
      active.commission_pct = Set(pct);
    }
    if let Some(flag) = is_active {
      active.is_active = Set(flag);
    }

    Ok(active.update(self.db).await?)
  }

  /// Uppercase exact match, active codes only.
  pub async fn lookup_active(
    &self,
    code: &str,
  ) -> Result<Option<discount_code::Model>> {
    Ok(
      discount_code::Entity::find()
        .filter(discount_code::Column::Code.eq(normalize(code)))
        .filter(discount_code::Column::IsActive.eq(true))
        .one(self.db)
        .await?,
    )
  }

  /// Removes the code and its dependent sales (matched by code string)
  /// in one transaction.
  pub async fn delete(&self, code_id: i32) -> Result<()> {
    let txn = self.db.begin().await?;

    let code = discount_code::Entity::find_by_id(code_id)
      .one(&txn)
      .await?
      .ok_or(Error::CodeNotFound)?;

    let cascaded = sale::Entity::delete_many()
      .filter(sale::Column::Code.eq(code.code.clone()))
      .exec(&txn)
      .await?;

    discount_code::Entity::delete_by_id(code_id).exec(&txn).await?;

    txn.commit().await?;

    info!(
      code = %code.code,
      sales = cascaded.rows_affected,
      "deleted discount code"
    );
    Ok(())
  }

  #[allow(dead_code)]
  pub async fn by_influencer(
    &self,
    influencer_id: i64,
  ) -> Result<Vec<discount_code::Model>> {
    Ok(
      discount_code::Entity::find()
        .filter(discount_code::Column::InfluencerId.eq(influencer_id))
        .order_by_asc(discount_code::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }

  pub async fn all(&self) -> Result<Vec<discount_code::Model>> {
    Ok(
      discount_code::Entity::find()
        .order_by_asc(discount_code::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }

  async fn exists(&self, code: &str) -> Result<bool> {
    Ok(
      discount_code::Entity::find()
        .filter(discount_code::Column::Code.eq(code))
        .one(self.db)
        .await?
        .is_some(),
    )
  }

  async fn generate(&self) -> Result<String> {
    for _ in 0..GENERATE_ATTEMPTS {
      let candidate =
        Uuid::new_v4().simple().to_string()[..8].to_uppercase();
      if !self.exists(&candidate).await? {
        return Ok(candidate);
      }
    }
    Err(Error::Internal("Could not generate a unique code".into()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::{Influencer, test_utils::test_db};

  async fn owner(db: &DatabaseConnection) -> i64 {
    Influencer::new(db).create("Maria", "maria@example.com").await.unwrap().id
  }

  #[tokio::test]
  async fn test_create_stores_uppercase() {
    let db = test_db::setup().await;
    let id = owner(&db).await;

    let code = Code::new(&db)
      .create(id, Some("  summer10 "), 10, 40, true)
      .await
      .unwrap();

    assert_eq!(code.code, "SUMMER10");
    assert!(code.is_active);
  }

  #[tokio::test]
  async fn test_percentages_must_be_in_range() {
    let db = test_db::setup().await;
    let id = owner(&db).await;
    let sv = Code::new(&db);

    for (discount, commission) in [(0, 40), (101, 40), (10, 0), (10, 101)] {
      let result = sv.create(id, Some("X"), discount, commission, true).await;
      assert!(matches!(result, Err(Error::InvalidArgs(_))));
    }

    assert!(sv.create(id, Some("LOW"), 1, 1, true).await.is_ok());
    assert!(sv.create(id, Some("HIGH"), 100, 100, true).await.is_ok());
  }

  #[tokio::test]
  async fn test_duplicate_code_is_case_insensitive() {
    let db = test_db::setup().await;
    let id = owner(&db).await;
    let sv = Code::new(&db);

    sv.create(id, Some("SUMMER10"), 10, 40, true).await.unwrap();
    let result = sv.create(id, Some("summer10"), 20, 30, false).await;

    assert!(matches!(result, Err(Error::CodeExists)));
  }

  #[tokio::test]
  async fn test_generated_code_when_omitted() {
    let db = test_db::setup().await;
    let id = owner(&db).await;

    let code = Code::new(&db).create(id, None, 10, 40, false).await.unwrap();

    assert_eq!(code.code.len(), 8);
    assert_eq!(code.code, code.code.to_uppercase());
  }

  #[tokio::test]
  async fn test_approve_activates_and_finalizes() {
    let db = test_db::setup().await;
    let id = owner(&db).await;
    let sv = Code::new(&db);

    let code = sv.create(id, Some("PENDING"), 5, 20, false).await.unwrap();
    assert!(!code.is_active);

    let approved = sv.approve(code.id, 10, 40).await.unwrap();

    assert!(approved.is_active);
    assert_eq!(approved.discount_pct, 10);
    assert_eq!(approved.commission_pct, 40);
  }

  #[tokio::test]
  async fn test_lookup_is_case_insensitive_and_active_only() {
    let db = test_db::setup().await;
    let id = owner(&db).await;
    let sv = Code::new(&db);

    sv.create(id, Some("SUMMER10"), 10, 40, true).await.unwrap();
    sv.create(id, Some("DORMANT"), 10, 40, false).await.unwrap();

    assert!(sv.lookup_active("summer10").await.unwrap().is_some());
    assert!(sv.lookup_active(" Summer10 ").await.unwrap().is_some());
    assert!(sv.lookup_active("DORMANT").await.unwrap().is_none());
    assert!(sv.lookup_active("MISSING").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_unknown_owner_rejected() {
    let db = test_db::setup().await;

    let result = Code::new(&db).create(999, Some("X"), 10, 40, true).await;

    assert!(matches!(result, Err(Error::InfluencerNotFound)));
  }
}
