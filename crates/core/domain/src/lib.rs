pub mod profile;

pub use profile::{
    ActingRange, AdditionalSkills, AgeGroup, AudienceDemographic, AudienceInterest,
    AvailabilityPreferences, BodyType, Collaboration, FacialLook, Fitness, Industry, Language,
    PersonalAttributes, PhysicalAppearance, ProfileSections, SECTION_KEYS, ScheduleFlexibility,
    SocialMediaPresence, TravelPreference,
};

/// 认证来源：API token 或 OAuth 建立的服务端会话。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    AccessToken,
    Session,
}

/// 认证上下文：两种登录路径产出的统一身份，所有受保护接口共享。
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub method: AuthMethod,
}

impl AuthContext {
    /// 构造显式身份的认证上下文。
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        method: AuthMethod,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            full_name: full_name.into(),
            method,
        }
    }
}
