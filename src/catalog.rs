//! Furniture catalog.
//!
//! The catalog is compiled into the binary and never mutated. Item ids
//! double as route keys (`/furniture/<id>`).

/// One piece of furniture.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: &'static str,
    pub name: &'static str,
    /// Image references relative to the asset root. Never empty.
    pub images: &'static [&'static str],
}

impl CatalogItem {
    /// First image, used as the gallery tile cover.
    pub fn cover(&self) -> &'static str {
        self.images[0]
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// `mailto:` link asking the studio about this piece.
    pub fn inquiry_mailto(&self, email: &str) -> String {
        let subject = format!("subject=Request about {}", self.name);
        match url::Url::parse(&format!("mailto:{}", email)) {
            Ok(mut url) => {
                url.set_query(Some(&subject));
                url.to_string()
            }
            Err(_) => format!("mailto:{}?{}", email, subject.replace(' ', "%20")),
        }
    }
}

/// Image shown on the home view.
pub const HERO_IMAGE: &str = "/images/hero-table.png";

const FURNITURE: &[CatalogItem] = &[
    CatalogItem {
        id: "table1",
        name: "Skarpt Bord",
        images: &[
            "/images/table/table-1.png",
            "/images/table/table-2.png",
            "/images/table/table-3.png",
        ],
    },
    CatalogItem {
        id: "chair1",
        name: "Skarp Stol",
        images: &[
            "/images/chair/chair-1.png",
            "/images/chair/chair-2.png",
            "/images/chair/chair-3.png",
        ],
    },
    CatalogItem {
        id: "shelf1",
        name: "Skarp Hylle",
        images: &[
            "/images/shelf/shelf-1.png",
            "/images/shelf/shelf-2.png",
            "/images/shelf/shelf-3.png",
        ],
    },
];

/// Ordered, read-only list of items.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    items: &'static [CatalogItem],
}

impl Catalog {
    /// The studio's built-in furniture list.
    pub fn furniture() -> Self {
        Self { items: FURNITURE }
    }

    pub fn items(&self) -> &'static [CatalogItem] {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static CatalogItem> {
        self.items.get(index)
    }

    /// Look up an item by id. A miss is a normal outcome (not-found view).
    pub fn find(&self, id: &str) -> Option<&'static CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::furniture()
    }
}
