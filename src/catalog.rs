use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const CANCEL_BUTTON: &str = "❌ Отмена";
pub const CONFIRM_BUTTON: &str = "✅ Подтвердить";

/// Upper bound for a single catalog price, in rubles.
pub const MAX_PRICE: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
pub enum Service {
    #[sqlx(rename = "photo_id")]
    DocumentPhoto,
    PhotoPrint,
    DocumentPrint,
    Souvenir,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::DocumentPhoto,
        Service::PhotoPrint,
        Service::DocumentPrint,
        Service::Souvenir,
    ];

    pub fn menu_label(self) -> &'static str {
        match self {
            Service::DocumentPhoto => "📸 Фото на документы",
            Service::PhotoPrint => "🖨️ Фотопечать",
            Service::DocumentPrint => "📄 Печать документов",
            Service::Souvenir => "👕 Сувениры",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Service::DocumentPhoto => "Фото на документы",
            Service::PhotoPrint => "Фотопечать",
            Service::DocumentPrint => "Печать документов",
            Service::Souvenir => "Сувениры",
        }
    }

    /// Main menu dispatch. Only the exact button text matches.
    pub fn from_menu_text(text: &str) -> Option<Service> {
        Service::ALL
            .into_iter()
            .find(|service| service.menu_label() == text)
    }
}

pub fn main_menu_buttons() -> Vec<&'static str> {
    Service::ALL.iter().map(|s| s.menu_label()).collect()
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Studio {
    pub key: String,
    pub title: String,
    pub address: String,
    #[serde(default)]
    pub admin_chat_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PriceOption {
    pub label: String,
    pub price: u32,
}

impl PriceOption {
    fn new(label: &str, price: u32) -> Self {
        Self {
            label: label.to_string(),
            price,
        }
    }

    pub fn button_text(&self) -> String {
        format!("{} — {} ₽", self.label, self.price)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
    pub studios: Vec<Studio>,
    pub document_photo_price: u32,
    pub print_sizes: Vec<PriceOption>,
    pub document_formats: Vec<PriceOption>,
    pub souvenirs: Vec<PriceOption>,
    pub payment_accounts: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            studios: vec![
                Studio {
                    key: "svetlanskaya".to_string(),
                    title: "A1 на Светланской".to_string(),
                    address: "г. Владивосток, ул. Светланская, 29".to_string(),
                    admin_chat_id: None,
                },
                Studio {
                    key: "aleutskaya".to_string(),
                    title: "A1 на Алеутской".to_string(),
                    address: "г. Владивосток, ул. Алеутская, 45".to_string(),
                    admin_chat_id: None,
                },
            ],
            document_photo_price: 350,
            print_sizes: vec![
                PriceOption::new("10×15", 25),
                PriceOption::new("15×21", 60),
                PriceOption::new("21×30", 120),
            ],
            document_formats: vec![
                PriceOption::new("A4 ч/б", 10),
                PriceOption::new("A4 цвет", 30),
                PriceOption::new("A3 цвет", 70),
            ],
            souvenirs: vec![
                PriceOption::new("Кружка", 600),
                PriceOption::new("Футболка", 1200),
                PriceOption::new("Магнит", 250),
            ],
            payment_accounts: vec!["+7 (423) 200-00-01".to_string()],
        }
    }
}

impl Catalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let path = path.as_ref();
        log::debug!("Loading catalog from {:?}", path);

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog at {}", path.display()))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Catalog> {
        let catalog: Catalog = serde_json::from_str(data).context("malformed catalog")?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        if self.studios.is_empty() {
            bail!("catalog has no studios");
        }

        let mut keys = HashSet::new();
        let mut titles = HashSet::new();
        for studio in &self.studios {
            if !keys.insert(studio.key.as_str()) {
                bail!("duplicate studio key {:?}", studio.key);
            }
            // answers are matched by title
            if !titles.insert(studio.title.as_str()) {
                bail!("duplicate studio title {:?}", studio.title);
            }
        }

        if self.document_photo_price > MAX_PRICE {
            bail!("document photo price exceeds {} ₽", MAX_PRICE);
        }

        for options in [&self.print_sizes, &self.document_formats, &self.souvenirs] {
            validate_options(options)?;
        }

        if self.payment_accounts.is_empty() {
            bail!("catalog has no payment accounts");
        }

        Ok(())
    }

    pub fn studio(&self, key: &str) -> Option<&Studio> {
        self.studios.iter().find(|studio| studio.key == key)
    }

    pub fn find_studio_by_title(&self, text: &str) -> Option<&Studio> {
        self.studios.iter().find(|studio| studio.title == text)
    }

    pub fn studio_title<'a>(&'a self, key: &'a str) -> &'a str {
        self.studio(key).map(|s| s.title.as_str()).unwrap_or(key)
    }

    /// Every chat that receives order notifications for some studio.
    pub fn studio_admin_chats(&self) -> impl Iterator<Item = i64> + '_ {
        self.studios.iter().filter_map(|studio| studio.admin_chat_id)
    }

    // Accounts rotate by order id so an order keeps its account across restarts.
    pub fn payment_account_for(&self, order_id: i64) -> &str {
        let index = order_id.rem_euclid(self.payment_accounts.len() as i64) as usize;
        &self.payment_accounts[index]
    }
}

fn validate_options(options: &[PriceOption]) -> Result<()> {
    if options.is_empty() {
        bail!("catalog option tables must not be empty");
    }

    let mut buttons = HashSet::new();
    for option in options {
        if option.price > MAX_PRICE {
            bail!("price of {:?} exceeds {} ₽", option.label, MAX_PRICE);
        }
        if !buttons.insert(option.button_text()) {
            bail!("duplicate option {:?}", option.button_text());
        }
    }

    Ok(())
}

pub fn find_option<'a>(options: &'a [PriceOption], text: &str) -> Option<&'a PriceOption> {
    options.iter().find(|option| option.button_text() == text)
}
