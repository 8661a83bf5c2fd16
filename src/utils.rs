use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, de};
pub use trim_in_place::*;

pub fn random_string(size: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(size)
        .map(char::from)
        .collect()
}

pub fn string_trim<'de, D>(d: D) -> Result<String, D::Error>
where
    D: de::Deserializer<'de>,
{
    let mut de_string = String::deserialize(d)?;
    de_string.trim_in_place();
    Ok(de_string)
}

pub fn option_string_trim<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let mut de_string: Option<String> = Option::deserialize(d)?;
    if let Some(ref mut de_string) = de_string {
        if de_string.trim_in_place().is_empty() {
            return Ok(None);
        }
    }
    Ok(de_string)
}

pub fn vec_trim_remove_empties<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let mut de_vec: Vec<String> = Vec::deserialize(d)?;
    de_vec = de_vec
        .iter_mut()
        .map(|s| s.trim_in_place().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
    Ok(de_vec)
}

pub(crate) fn is_default<T: Default + PartialEq>(t: &T) -> bool {
    t == &T::default()
}
