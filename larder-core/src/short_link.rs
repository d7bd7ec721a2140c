use rand::distributions::Alphanumeric;
use rand::Rng;

pub const TOKEN_LENGTH: usize = 8;

/// How many fresh tokens recipe creation tries before giving up on a
/// short-link collision.
pub const MAX_ATTEMPTS: usize = 5;

pub fn generate_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Public URL that redirects to the recipe behind `token`.
pub fn short_url(public_url: &str, token: &str) -> String {
    format!("{}/s/{}", public_url.trim_end_matches('/'), token)
}

/// Canonical frontend URL of a recipe, the redirect target of a short link.
pub fn recipe_url(public_url: &str, recipe_id: &uuid::Uuid) -> String {
    format!("{}/recipes/{}", public_url.trim_end_matches('/'), recipe_id)
}
