//! Board categories and their external ids.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of categories a board can be filed under.
///
/// Serialized as the site's external id (the value posted in forms and
/// exposed through the `pinterestapp:category` meta property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardCategory {
    Architecture,
    Art,
    CarsMotorcycles,
    Design,
    DiyCrafts,
    Education,
    FilmMusicBooks,
    Fitness,
    FoodDrink,
    Gifts,
    HairBeauty,
    History,
    Holidays,
    Home,
    Humor,
    Kids,
    #[serde(rename = "mylife")]
    MyLife,
    WomenApparel,
    MenApparel,
    Outdoors,
    People,
    Pets,
    Photography,
    PrintsPosters,
    Products,
    Science,
    Sports,
    Technology,
    TravelPlaces,
    WeddingEvents,
    Other,
}

impl BoardCategory {
    pub const ALL: [BoardCategory; 31] = [
        BoardCategory::Architecture,
        BoardCategory::Art,
        BoardCategory::CarsMotorcycles,
        BoardCategory::Design,
        BoardCategory::DiyCrafts,
        BoardCategory::Education,
        BoardCategory::FilmMusicBooks,
        BoardCategory::Fitness,
        BoardCategory::FoodDrink,
        BoardCategory::Gifts,
        BoardCategory::HairBeauty,
        BoardCategory::History,
        BoardCategory::Holidays,
        BoardCategory::Home,
        BoardCategory::Humor,
        BoardCategory::Kids,
        BoardCategory::MyLife,
        BoardCategory::WomenApparel,
        BoardCategory::MenApparel,
        BoardCategory::Outdoors,
        BoardCategory::People,
        BoardCategory::Pets,
        BoardCategory::Photography,
        BoardCategory::PrintsPosters,
        BoardCategory::Products,
        BoardCategory::Science,
        BoardCategory::Sports,
        BoardCategory::Technology,
        BoardCategory::TravelPlaces,
        BoardCategory::WeddingEvents,
        BoardCategory::Other,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BoardCategory::Architecture => "architecture",
            BoardCategory::Art => "art",
            BoardCategory::CarsMotorcycles => "cars_motorcycles",
            BoardCategory::Design => "design",
            BoardCategory::DiyCrafts => "diy_crafts",
            BoardCategory::Education => "education",
            BoardCategory::FilmMusicBooks => "film_music_books",
            BoardCategory::Fitness => "fitness",
            BoardCategory::FoodDrink => "food_drink",
            BoardCategory::Gifts => "gifts",
            BoardCategory::HairBeauty => "hair_beauty",
            BoardCategory::History => "history",
            BoardCategory::Holidays => "holidays",
            BoardCategory::Home => "home",
            BoardCategory::Humor => "humor",
            BoardCategory::Kids => "kids",
            BoardCategory::MyLife => "mylife",
            BoardCategory::WomenApparel => "women_apparel",
            BoardCategory::MenApparel => "men_apparel",
            BoardCategory::Outdoors => "outdoors",
            BoardCategory::People => "people",
            BoardCategory::Pets => "pets",
            BoardCategory::Photography => "photography",
            BoardCategory::PrintsPosters => "prints_posters",
            BoardCategory::Products => "products",
            BoardCategory::Science => "science",
            BoardCategory::Sports => "sports",
            BoardCategory::Technology => "technology",
            BoardCategory::TravelPlaces => "travel_places",
            BoardCategory::WeddingEvents => "wedding_events",
            BoardCategory::Other => "other",
        }
    }

    /// Looks a category up by external id; `None` for ids the site added
    /// after this list was written.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for BoardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
