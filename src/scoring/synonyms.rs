//! Fixed synonym-expansion table for vibe matching. A desired vibe counts as
//! a half-strength hit when any of its related tags appears on the venue.

/// Venue tags considered related to an abstract vibe label.
pub fn related_tags(vibe: &str) -> &'static [&'static str] {
    match vibe {
        "romantic" => &["intimate", "cozy", "candlelit", "date night", "scenic"],
        "cozy" => &["intimate", "warm", "quiet", "snug", "comfortable"],
        "adventurous" => &["outdoor", "active", "thrill", "exciting", "exploration"],
        "relaxed" => &["chill", "laid back", "calm", "casual", "mellow"],
        "chill" => &["relaxed", "laid back", "casual", "low key"],
        "lively" => &["energetic", "bustling", "vibrant", "loud", "social"],
        "energetic" => &["lively", "active", "upbeat", "vibrant"],
        "artsy" => &["creative", "gallery", "artistic", "indie", "eclectic"],
        "quirky" => &["unique", "eclectic", "offbeat", "fun", "unusual"],
        "upscale" => &["elegant", "fancy", "refined", "classy", "fine dining"],
        "quiet" => &["calm", "peaceful", "intimate", "serene"],
        "scenic" => &["views", "waterfront", "outdoor", "beautiful"],
        "fun" => &["playful", "entertaining", "games", "lively"],
        "intimate" => &["cozy", "romantic", "quiet", "small"],
        "outdoorsy" => &["outdoor", "nature", "hiking", "fresh air", "park"],
        _ => &[],
    }
}
