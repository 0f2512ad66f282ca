//! Postgres 达人资料存储实现
//!
//! 六个分区各占一列 JSONB，读写时经由 `sqlx::types::Json` 与 domain 类型互转。

use crate::error::StorageError;
use crate::models::ProfileRecord;
use crate::traits::ProfileStore;
use domain::{
    AdditionalSkills, AudienceDemographic, AvailabilityPreferences, PersonalAttributes,
    PhysicalAppearance, ProfileSections, SocialMediaPresence,
};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

const PROFILE_COLUMNS: &str = "profile_id, owner_id, personal_attributes, physical_appearance, \
                               availability_preferences, audience_demographic, \
                               social_media_presence, additional_skills, profile_picture, \
                               created_at, updated_at";

pub struct PgProfileStore {
    pub pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &PgRow) -> Result<ProfileRecord, StorageError> {
    let Json(personal_attributes): Json<PersonalAttributes> = row.try_get("personal_attributes")?;
    let Json(physical_appearance): Json<PhysicalAppearance> = row.try_get("physical_appearance")?;
    let Json(availability_preferences): Json<AvailabilityPreferences> =
        row.try_get("availability_preferences")?;
    let Json(audience_demographic): Json<AudienceDemographic> =
        row.try_get("audience_demographic")?;
    let Json(social_media_presence): Json<SocialMediaPresence> =
        row.try_get("social_media_presence")?;
    let Json(additional_skills): Json<AdditionalSkills> = row.try_get("additional_skills")?;
    Ok(ProfileRecord {
        profile_id: row.try_get("profile_id")?,
        owner_id: row.try_get("owner_id")?,
        sections: ProfileSections {
            personal_attributes,
            physical_appearance,
            availability_preferences,
            audience_demographic,
            social_media_presence,
            additional_skills,
        },
        profile_picture: row.try_get("profile_picture")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<ProfileRecord>, StorageError> {
        let sql = format!("select {PROFILE_COLUMNS} from profiles where owner_id = $1");
        let row = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| profile_from_row(&row)).transpose()
    }

    async fn create_profile(&self, record: ProfileRecord) -> Result<ProfileRecord, StorageError> {
        let sections = &record.sections;
        let sql = format!(
            "insert into profiles (profile_id, owner_id, personal_attributes, physical_appearance, \
             availability_preferences, audience_demographic, social_media_presence, \
             additional_skills, profile_picture, created_at, updated_at) \
             values ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11) returning {PROFILE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&record.profile_id)
            .bind(&record.owner_id)
            .bind(Json(&sections.personal_attributes))
            .bind(Json(&sections.physical_appearance))
            .bind(Json(&sections.availability_preferences))
            .bind(Json(&sections.audience_demographic))
            .bind(Json(&sections.social_media_presence))
            .bind(Json(&sections.additional_skills))
            .bind(&record.profile_picture)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        profile_from_row(&row)
    }

    async fn update_sections(
        &self,
        owner_id: &str,
        sections: &ProfileSections,
    ) -> Result<Option<ProfileRecord>, StorageError> {
        let sql = format!(
            "update profiles set personal_attributes = $2, physical_appearance = $3, \
             availability_preferences = $4, audience_demographic = $5, \
             social_media_presence = $6, additional_skills = $7, updated_at = now() \
             where owner_id = $1 returning {PROFILE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(owner_id)
            .bind(Json(&sections.personal_attributes))
            .bind(Json(&sections.physical_appearance))
            .bind(Json(&sections.availability_preferences))
            .bind(Json(&sections.audience_demographic))
            .bind(Json(&sections.social_media_presence))
            .bind(Json(&sections.additional_skills))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| profile_from_row(&row)).transpose()
    }

    async fn set_profile_picture(
        &self,
        owner_id: &str,
        url: &str,
    ) -> Result<Option<ProfileRecord>, StorageError> {
        let sql = format!(
            "update profiles set profile_picture = $2, updated_at = now() \
             where owner_id = $1 returning {PROFILE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(owner_id)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| profile_from_row(&row)).transpose()
    }
}
