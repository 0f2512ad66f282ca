use crate::AuthError;
use argon2::{
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    password_hash::SaltString,
};
use rand_core::OsRng;

/// 旧系统写入的 bcrypt 哈希前缀。
const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

pub struct PasswordCheck {
    pub verified: bool,
    pub upgrade_hash: Option<String>,
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::Internal(err.to_string()))?;
    Ok(hash.to_string())
}

/// 校验口令；bcrypt 哈希校验通过时附带一个新的 argon2 哈希供调用方回写。
pub fn verify_password_and_maybe_upgrade(
    stored_password_hash: &str,
    password: &str,
) -> Result<PasswordCheck, AuthError> {
    if stored_password_hash.starts_with("$argon2") {
        let parsed = PasswordHash::new(stored_password_hash)
            .map_err(|err| AuthError::Internal(err.to_string()))?;
        let argon2 = Argon2::default();
        let verified = argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        return Ok(PasswordCheck {
            verified,
            upgrade_hash: None,
        });
    }

    if !is_bcrypt_hash(stored_password_hash) {
        // 未知格式（含明文）一律拒绝
        return Ok(PasswordCheck {
            verified: false,
            upgrade_hash: None,
        });
    }

    let verified = bcrypt::verify(password, stored_password_hash)
        .map_err(|err| AuthError::Internal(err.to_string()))?;
    if !verified {
        return Ok(PasswordCheck {
            verified: false,
            upgrade_hash: None,
        });
    }

    let new_hash = hash_password(password)?;
    Ok(PasswordCheck {
        verified: true,
        upgrade_hash: Some(new_hash),
    })
}

fn is_bcrypt_hash(stored_password_hash: &str) -> bool {
    BCRYPT_PREFIXES
        .iter()
        .any(|prefix| stored_password_hash.starts_with(prefix))
}

/// 在阻塞线程池中计算哈希，不占用异步 worker。
pub(crate) async fn hash_password_blocking(password: &str) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| AuthError::Internal(err.to_string()))?
}

pub(crate) async fn verify_password_blocking(
    stored_password_hash: &str,
    password: &str,
) -> Result<PasswordCheck, AuthError> {
    let stored_password_hash = stored_password_hash.to_string();
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        verify_password_and_maybe_upgrade(&stored_password_hash, &password)
    })
    .await
    .map_err(|err| AuthError::Internal(err.to_string()))?
}
