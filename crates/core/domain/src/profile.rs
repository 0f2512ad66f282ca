//! 达人资料（Profile）各分区与取值枚举。
//!
//! 枚举的序列化字符串与历史数据保持一致（包括空格、大小写，以及
//! `"Commercial Ads and Brand Collaboration "` 尾部的空格）。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 顶层分区字段名（更新时按分区做一层浅合并）。
pub const SECTION_KEYS: [&str; 6] = [
    "personalAttributes",
    "physicalAppearance",
    "availabilityPreferences",
    "audienceDemographic",
    "socialMediaPresence",
    "additionalSkills",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Industry {
    Actor,
    Cricketer,
    Influencer,
    Athlete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    Muscular,
    #[serde(rename = "Thin and Muscular")]
    ThinAndMuscular,
    #[serde(rename = "Tall and Fit")]
    TallAndFit,
    Slim,
    Athletic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacialLook {
    Square,
    #[serde(rename = "Round Face")]
    RoundFace,
    #[serde(rename = "Long face with Jawline")]
    LongFaceWithJawline,
    #[serde(rename = "Long Face with French Beared")]
    LongFaceWithFrenchBeard,
    #[serde(rename = "Square Face with Beared")]
    SquareFaceWithBeard,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fitness {
    Fit,
    Good,
    Moderate,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelPreference {
    Domestic,
    International,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collaboration {
    #[serde(rename = "Commercial Ads and Brand Collaboration ")]
    CommercialAdsAndBrandCollaboration,
    Remote,
    #[serde(rename = "In-Person")]
    InPerson,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleFlexibility {
    Flexible,
    Fixed,
    Negotiable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudienceInterest {
    Entertainment,
    Sports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "All Age Groups")]
    AllAgeGroups,
    #[serde(rename = "Below 18")]
    Below18,
    #[serde(rename = "18-40")]
    From18To40,
    #[serde(rename = "Above 40")]
    Above40,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActingRange {
    Drama,
    Comedy,
    Action,
    Romantic,
}

/// 个人属性。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersonalAttributes {
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "date_format")]
    pub dob: NaiveDate,
    pub location: String,
    pub industry: Industry,
    pub language: Vec<Language>,
}

/// 外形特征。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhysicalAppearance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    pub body_type: BodyType,
    pub facial_look: FacialLook,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness: Option<Fitness>,
}

/// 档期与合作偏好。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AvailabilityPreferences {
    pub travel_preference: TravelPreference,
    pub preferred_collaboration: Collaboration,
    pub schedule_flexibility: ScheduleFlexibility,
}

/// 受众画像。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AudienceDemographic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_interest: Option<AudienceInterest>,
    pub popular_among_age_group: AgeGroup,
}

/// 社交媒体粉丝数（缺省为 0）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SocialMediaPresence {
    #[serde(default)]
    pub facebook_followers: u64,
    #[serde(default)]
    pub instagram_followers: u64,
    #[serde(default)]
    pub linkedin_followers: u64,
    #[serde(default)]
    pub twitter_followers: u64,
    #[serde(default)]
    pub snapchat_followers: u64,
}

/// 附加技能。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdditionalSkills {
    #[serde(default)]
    pub musical_talents: bool,
    #[serde(default)]
    pub dance_abilities: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acting_range: Option<ActingRange>,
    #[serde(default)]
    pub public_speaking: bool,
}

/// Profile 文档的全部分区。
///
/// 顶层未知字段忽略（owner、profilePicture 等不能经由请求体写入），
/// 分区内部未知字段拒绝。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSections {
    pub personal_attributes: PersonalAttributes,
    pub physical_appearance: PhysicalAppearance,
    pub availability_preferences: AvailabilityPreferences,
    pub audience_demographic: AudienceDemographic,
    #[serde(default)]
    pub social_media_presence: SocialMediaPresence,
    #[serde(default)]
    pub additional_skills: AdditionalSkills,
}

impl ProfileSections {
    /// 枚举之外的字段级约束：必填字符串非空、语言列表非空。
    pub fn validate(&self) -> Result<(), String> {
        let personal = &self.personal_attributes;
        let required = [
            ("personalAttributes.firstName", personal.first_name.as_str()),
            ("personalAttributes.lastName", personal.last_name.as_str()),
            ("personalAttributes.location", personal.location.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{field} required"));
            }
        }
        if personal.language.is_empty() {
            return Err("personalAttributes.language required".to_string());
        }
        Ok(())
    }
}

/// 出生日期：输出 `YYYY-MM-DD`；输入同时接受 RFC 3339 时间戳（取 UTC 日期）。
mod date_format {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|value| value.naive_utc().date())
            .map_err(|_| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}
