//! DTO 转换

use api_contract::{ProfileDto, UserDto};
use buzz_storage::{ProfileRecord, UserRecord};

/// 对外用户信息：不含口令哈希与 refresh token
pub fn user_to_dto(user: &UserRecord) -> UserDto {
    UserDto {
        id: user.user_id.clone(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        google_id: user.google_id.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn profile_to_dto(profile: ProfileRecord) -> ProfileDto {
    ProfileDto {
        id: profile.profile_id,
        owner: profile.owner_id,
        sections: profile.sections,
        profile_picture: profile.profile_picture,
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }
}
