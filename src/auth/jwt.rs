use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CryptResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorClaims {
    pub sub: String,
    #[serde(default)]
    pub role: String,
    pub exp: i64,
}

impl InstructorClaims {
    pub fn new(instructor_id: Uuid, role: &str, exp: i64) -> Self {
        Self {
            sub: instructor_id.to_string(),
            role: role.to_string(),
            exp,
        }
    }

    pub fn instructor_id(&self) -> CryptResult<Uuid> {
        Ok(self.sub.parse::<Uuid>()?)
    }
}

pub fn generate_token<K: AsRef<[u8]>>(
    claims: InstructorClaims,
    key: K,
) -> jsonwebtoken::errors::Result<String> {
    let header = Header::default();
    let key = EncodingKey::from_secret(key.as_ref());

    let token = jsonwebtoken::encode(&header, &claims, &key)?;
    Ok(token)
}

pub fn process_token<K: AsRef<[u8]>>(
    token: &str,
    key: K,
) -> jsonwebtoken::errors::Result<TokenData<InstructorClaims>> {
    let validation = Validation::default();
    let key = DecodingKey::from_secret(key.as_ref());

    let claims = jsonwebtoken::decode::<InstructorClaims>(token, &key, &validation)?;
    Ok(claims)
}
