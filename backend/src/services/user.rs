//! User service for authentication and account management
//!
//! Password hashing and verification run on the blocking thread pool; the
//! JWT service is passed by reference (pre-computed keys).

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{UpdateUserProfile, UserRecord, UserRepository};
use microlab_shared::types::{
    AuthResponse, PaginatedResponse, PaginationMeta, PublicUser, UpdateProfileRequest,
};
use microlab_shared::validation::{validate_password, validate_username};
use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// Uniqueness is checked with two sequential lookups (email first, then
    /// username). A concurrent registration racing between the lookups and
    /// the insert surfaces as a duplicate-key database error instead of a
    /// 409.
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        if !email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        validate_username(username).map_err(ApiError::Validation)?;
        validate_password(password).map_err(ApiError::Validation)?;

        if UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        if UserRepository::find_by_username(pool, username)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(ApiError::Conflict("Username already taken".to_string()));
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(pool, email, username, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        Self::issue_response(jwt_service, user)
    }

    /// Login with email and password
    ///
    /// Unknown email and failed verification return the identical message so
    /// callers cannot tell which check failed.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let user = UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid =
            PasswordService::verify_async(password.to_string(), user.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        Self::issue_response(jwt_service, user)
    }

    /// Get a sanitized user profile
    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<PublicUser, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(Self::sanitize(user))
    }

    /// Partially update a user's profile
    ///
    /// A supplied password is validated and hashed before persistence; a
    /// value that already looks like a digest is stored as-is rather than
    /// hashed a second time.
    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        updates: UpdateProfileRequest,
    ) -> Result<PublicUser, ApiError> {
        let password_hash = match updates.password {
            Some(password) if PasswordService::is_hashed(&password) => Some(password),
            Some(password) => {
                validate_password(&password).map_err(ApiError::Validation)?;
                Some(
                    PasswordService::hash_async(password)
                        .await
                        .map_err(ApiError::Internal)?,
                )
            }
            None => None,
        };

        if let Some(preferences) = &updates.preferences {
            if !preferences.is_object() {
                return Err(ApiError::Validation(
                    "Preferences must be a key-value map".to_string(),
                ));
            }
        }

        let user = UserRepository::update_profile(
            pool,
            user_id,
            UpdateUserProfile {
                full_name: updates.full_name,
                lab_role: updates.lab_role,
                preferences: updates.preferences,
                password_hash,
            },
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(Self::sanitize(user))
    }

    /// List all users, sanitized and paginated (admin view)
    pub async fn list_users(
        pool: &PgPool,
        page: i64,
        limit: i64,
    ) -> Result<PaginatedResponse<PublicUser>, ApiError> {
        let offset = (page - 1) * limit;

        let users = UserRepository::list(pool, limit, offset)
            .await
            .map_err(ApiError::Internal)?;
        let total = UserRepository::count(pool)
            .await
            .map_err(ApiError::Internal)?;

        Ok(PaginatedResponse {
            data: users.into_iter().map(Self::sanitize).collect(),
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    /// Reduce a database record to the caller-visible allow-list
    pub fn sanitize(user: UserRecord) -> PublicUser {
        PublicUser {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role.parse().unwrap_or_default(),
            full_name: user.full_name,
            lab_role: user.lab_role,
            preferences: user.preferences,
        }
    }

    fn issue_response(
        jwt_service: &JwtService,
        user: UserRecord,
    ) -> Result<AuthResponse, ApiError> {
        let role = user.role.parse().unwrap_or_default();
        let access_token = jwt_service
            .issue(user.id, &user.email, role)
            .map_err(ApiError::Internal)?;

        Ok(AuthResponse {
            access_token,
            user: Self::sanitize(user),
        })
    }
}
