use crate::{entity::influencer, prelude::*};

pub struct Influencer<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Influencer<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Self-service registration: starts unapproved until an admin signs
  /// off.
  pub async fn create(
    &self,
    name: &str,
    email: &str,
  ) -> Result<influencer::Model> {
    let name = name.trim();
    let email = email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() {
      return Err(Error::InvalidArgs("Name and email are required".into()));
    }

    let existing = influencer::Entity::find()
      .filter(influencer::Column::Email.eq(&email))
      .one(self.db)
      .await?;
    if existing.is_some() {
      return Err(Error::EmailExists);
    }

    let now = Utc::now().naive_utc();
    let influencer = influencer::ActiveModel {
      id: NotSet,
      name: Set(name.to_string()),
      email: Set(email),
      is_approved: Set(false),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    info!(influencer = influencer.id, "registered influencer");
    Ok(influencer)
  }

  pub async fn approve(&self, id: i64) -> Result<influencer::Model> {
    let influencer = influencer::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::InfluencerNotFound)?;

    Ok(
      influencer::ActiveModel { is_approved: Set(true), ..influencer.into() }
        .update(self.db)
        .await?,
    )
  }

  #[allow(dead_code)]
  pub async fn by_id(&self, id: i64) -> Result<Option<influencer::Model>> {
    Ok(influencer::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn all(&self) -> Result<Vec<influencer::Model>> {
    Ok(
      influencer::Entity::find()
        .order_by_asc(influencer::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }
}
