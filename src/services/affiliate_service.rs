use bson::doc;
use mongodb::Client;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::models::user::User;

pub struct AffiliateService;

impl AffiliateService {
    /// A referral code is valid iff it belongs to an active affiliate.
    /// Unknown, pending and rejected codes are simply invalid; this never
    /// fails the booking flow with a validation error.
    pub async fn validate_code(client: &Client, code: &str) -> mongodb::error::Result<bool> {
        if code.is_empty() {
            return Ok(false);
        }
        let users: mongodb::Collection<User> = client.database("ThaiKick").collection("Users");
        let found = users
            .find_one(doc! {
                "affiliate_code": code,
                "is_affiliate": true,
                "affiliate_status": "active",
            })
            .await?;
        Ok(found.is_some())
    }

    /// Referral code assigned on approval: the first word of the user's name
    /// uppercased, plus a short random suffix, e.g. "SOMCHAI-X4T9".
    pub fn generate_code(name: &str) -> String {
        let prefix: String = name
            .split_whitespace()
            .next()
            .unwrap_or("KRU")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_uppercase();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(4)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();
        let prefix = if prefix.is_empty() { "KRU".to_string() } else { prefix };
        format!("{}-{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_carry_the_name_prefix() {
        let code = AffiliateService::generate_code("Somchai Prasert");
        assert!(code.starts_with("SOMCHAI-"));
        assert_eq!(code.len(), "SOMCHAI-".len() + 4);
    }

    #[test]
    fn unusable_names_fall_back_to_a_default_prefix() {
        let code = AffiliateService::generate_code("   ");
        assert!(code.starts_with("KRU-"));
    }
}
