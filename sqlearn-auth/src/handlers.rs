use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use sqlearn_common::{ApiError, Role};
use sqlearn_db::connection::DbPool;
use sqlearn_db::models::user::{NewUser, User};

use crate::models::{HashingConfig, SignInInput, SignInOutput, SignUpInput, SignUpOutput};

#[post("/login")]
pub(crate) async fn login(
    pool: web::Data<DbPool>,
    hashing: web::Data<HashingConfig>,
    input: web::Json<SignInInput>,
) -> Result<HttpResponse, ApiError> {
    let SignInInput {
        identifier,
        password,
    } = input.into_inner();
    let hashing = *hashing.get_ref();

    let user = web::block(move || -> Result<User, ApiError> {
        let mut conn = pool.get()?;
        let user = match User::find_by_email(identifier.trim(), &mut conn)? {
            Some(user) => user,
            None => {
                hashing.reject_unknown(&password)?;
                return Err(ApiError::Unauthorized);
            }
        };
        if !hashing.verify(&password, &user.hash_pwd)? {
            return Err(ApiError::Unauthorized);
        }
        user.touch_last_login(Utc::now().naive_utc(), &mut conn)?;
        Ok(user)
    })
    .await??;

    let role = role_of(&user)?;
    log::info!("user {} signed in", user.id);
    Ok(HttpResponse::Ok().json(SignInOutput {
        success: true,
        user_id: user.id,
        role,
        user_name: user.name,
    }))
}

#[post("/signup")]
pub(crate) async fn signup(
    pool: web::Data<DbPool>,
    hashing: web::Data<HashingConfig>,
    input: web::Json<SignUpInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner().validate()?;
    let hashing = *hashing.get_ref();

    let user = web::block(move || -> Result<User, ApiError> {
        let mut conn = pool.get()?;
        if User::find_by_email(&input.identifier, &mut conn)?.is_some() {
            return Err(ApiError::Conflict("identifier already taken".into()));
        }
        let new_user = NewUser {
            name: input.name,
            email: input.identifier,
            hash_pwd: hashing.hash(&input.password)?,
            user_role: input.role.to_string(),
            joined_at: Utc::now().naive_utc(),
        };
        // A concurrent signup can still win the race; the unique index turns it into a conflict.
        new_user.create(&mut conn).map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict("identifier already taken".into()),
            other => other,
        })
    })
    .await??;

    log::info!("registered user {} as {}", user.id, user.user_role);
    Ok(HttpResponse::Ok().json(SignUpOutput {
        success: true,
        user_id: user.id,
        role: role_of(&user)?,
    }))
}

fn role_of(user: &User) -> Result<Role, ApiError> {
    user.user_role.parse().map_err(|_| {
        ApiError::internal(format!("user {} has unknown role {}", user.id, user.user_role))
    })
}
