use std::fmt::Write as _;

use teloxide::utils::html;

use crate::catalog::{find_option, Catalog, PriceOption, Service, Studio, CANCEL_BUTTON, CONFIRM_BUTTON};
use crate::util::normalize_phone;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Studio,
    PrintSize,
    Paper,
    DocumentFormat,
    SouvenirItem,
    Quantity,
    Phone,
    AppointmentTime,
    Confirm,
}

pub fn steps_for(service: Service) -> &'static [Step] {
    match service {
        Service::DocumentPhoto => &[Step::Studio, Step::Phone, Step::AppointmentTime, Step::Confirm],
        Service::PhotoPrint => &[
            Step::Studio,
            Step::PrintSize,
            Step::Paper,
            Step::Quantity,
            Step::Phone,
            Step::Confirm,
        ],
        Service::DocumentPrint => &[
            Step::Studio,
            Step::DocumentFormat,
            Step::Quantity,
            Step::Phone,
            Step::Confirm,
        ],
        Service::Souvenir => &[
            Step::Studio,
            Step::SouvenirItem,
            Step::Quantity,
            Step::Phone,
            Step::Confirm,
        ],
    }
}

pub fn first_step(service: Service) -> Step {
    steps_for(service)[0]
}

pub fn next_step(service: Service, step: Step) -> Option<Step> {
    let steps = steps_for(service);
    let position = steps.iter().position(|s| *s == step)?;
    steps.get(position + 1).copied()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paper {
    Glossy,
    Matte,
}

impl Paper {
    pub const ALL: [Paper; 2] = [Paper::Glossy, Paper::Matte];

    pub fn label(self) -> &'static str {
        match self {
            Paper::Glossy => "Глянцевая",
            Paper::Matte => "Матовая",
        }
    }

    fn from_text(text: &str) -> Option<Paper> {
        Paper::ALL.into_iter().find(|paper| paper.label() == text)
    }
}

/// Largest accepted quantity per service.
pub fn max_quantity(service: Service) -> u32 {
    match service {
        Service::PhotoPrint => 100,
        Service::DocumentPrint => 500,
        Service::Souvenir => 50,
        Service::DocumentPhoto => 1,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidAnswer {
    NotText,
    UnknownStudio,
    UnknownOption,
    UnknownPaper,
    BadQuantity { max: u32 },
    BadPhone,
    BadAppointment,
    NotConfirmed,
}

impl InvalidAnswer {
    pub fn hint(&self) -> String {
        match self {
            InvalidAnswer::NotText => "Пожалуйста, ответьте текстом.".to_string(),
            InvalidAnswer::UnknownStudio => "Выберите студию кнопкой ниже.".to_string(),
            InvalidAnswer::UnknownOption => "Выберите вариант кнопкой ниже.".to_string(),
            InvalidAnswer::UnknownPaper => "Выберите тип бумаги кнопкой ниже.".to_string(),
            InvalidAnswer::BadQuantity { max } => {
                format!("Введите число от 1 до {}.", max)
            }
            InvalidAnswer::BadPhone => {
                "Не похоже на номер телефона. Пример: +7 914 123-45-67".to_string()
            }
            InvalidAnswer::BadAppointment => {
                "Укажите дату и время, например: 1 декабря 10:00".to_string()
            }
            InvalidAnswer::NotConfirmed => {
                format!("Нажмите «{}» или «{}».", CONFIRM_BUTTON, CANCEL_BUTTON)
            }
        }
    }
}

/// Answers collected so far in one conversation.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderDraft {
    pub service: Service,
    pub studio: Option<Studio>,
    pub option: Option<PriceOption>,
    pub paper: Option<Paper>,
    pub quantity: Option<u32>,
    pub phone: Option<String>,
    pub appointment: Option<String>,
}

impl OrderDraft {
    pub fn new(service: Service) -> Self {
        Self {
            service,
            studio: None,
            option: None,
            paper: None,
            quantity: None,
            phone: None,
            appointment: None,
        }
    }

    /// Validates `text` as the answer to `step`. On error the draft is left
    /// untouched and the same step should be asked again.
    pub fn apply(&self, catalog: &Catalog, step: Step, text: &str) -> Result<OrderDraft, InvalidAnswer> {
        let text = text.trim();
        let mut draft = self.clone();

        match step {
            Step::Studio => {
                let studio = catalog
                    .find_studio_by_title(text)
                    .ok_or(InvalidAnswer::UnknownStudio)?;
                draft.studio = Some(studio.clone());
            }
            Step::PrintSize | Step::DocumentFormat | Step::SouvenirItem => {
                let option = find_option(options_for(catalog, step), text)
                    .ok_or(InvalidAnswer::UnknownOption)?;
                draft.option = Some(option.clone());
            }
            Step::Paper => {
                draft.paper = Some(Paper::from_text(text).ok_or(InvalidAnswer::UnknownPaper)?);
            }
            Step::Quantity => {
                let max = max_quantity(self.service);
                let quantity = text
                    .parse::<u32>()
                    .ok()
                    .filter(|q| (1..=max).contains(q))
                    .ok_or(InvalidAnswer::BadQuantity { max })?;
                draft.quantity = Some(quantity);
            }
            Step::Phone => {
                draft.phone = Some(normalize_phone(text).ok_or(InvalidAnswer::BadPhone)?);
            }
            Step::AppointmentTime => {
                let length = text.chars().count();
                if !(3..=100).contains(&length) {
                    return Err(InvalidAnswer::BadAppointment);
                }
                draft.appointment = Some(text.to_string());
            }
            Step::Confirm => {
                if text != CONFIRM_BUTTON {
                    return Err(InvalidAnswer::NotConfirmed);
                }
            }
        }

        Ok(draft)
    }

    pub fn total_price(&self, catalog: &Catalog) -> u64 {
        match self.service {
            Service::DocumentPhoto => u64::from(catalog.document_photo_price),
            _ => {
                let unit = self.option.as_ref().map(|o| o.price).unwrap_or(0);
                u64::from(unit) * u64::from(self.quantity.unwrap_or(1))
            }
        }
    }

    /// How many uploaded files complete the order.
    pub fn expected_uploads(&self) -> u32 {
        match self.service {
            Service::DocumentPhoto => 0,
            Service::PhotoPrint => self.quantity.unwrap_or(1),
            Service::DocumentPrint | Service::Souvenir => 1,
        }
    }

    /// Plain-text summary that is stored with the order.
    pub fn details(&self) -> String {
        let mut lines = Vec::new();

        if let Some(option) = &self.option {
            let name = match self.service {
                Service::PhotoPrint => "Формат",
                Service::DocumentPrint => "Печать",
                _ => "Изделие",
            };
            lines.push(format!("{}: {}", name, option.label));
        }
        if let Some(paper) = self.paper {
            lines.push(format!("Бумага: {}", paper.label()));
        }
        if let Some(quantity) = self.quantity {
            let name = match self.service {
                Service::PhotoPrint => "Фотографий",
                Service::DocumentPrint => "Страниц",
                _ => "Количество",
            };
            lines.push(format!("{}: {}", name, quantity));
        }
        if let Some(phone) = &self.phone {
            lines.push(format!("Телефон: {}", phone));
        }
        if let Some(appointment) = &self.appointment {
            lines.push(format!("Время: {}", appointment));
        }

        lines.join("\n")
    }
}

fn options_for(catalog: &Catalog, step: Step) -> &[PriceOption] {
    match step {
        Step::PrintSize => &catalog.print_sizes,
        Step::DocumentFormat => &catalog.document_formats,
        Step::SouvenirItem => &catalog.souvenirs,
        _ => &[],
    }
}

pub struct Prompt {
    pub text: String,
    pub buttons: Vec<String>,
}

/// Question (HTML) and reply buttons for `step`.
pub fn prompt(catalog: &Catalog, step: Step, draft: &OrderDraft) -> Prompt {
    let (text, mut buttons): (String, Vec<String>) = match step {
        Step::Studio => (
            "Выберите студию:".to_string(),
            catalog.studios.iter().map(|s| s.title.clone()).collect(),
        ),
        Step::PrintSize => (
            "Выберите формат печати:".to_string(),
            button_texts(&catalog.print_sizes),
        ),
        Step::Paper => (
            "Выберите тип бумаги:".to_string(),
            Paper::ALL.iter().map(|p| p.label().to_string()).collect(),
        ),
        Step::DocumentFormat => (
            "Выберите формат и цветность (цена за страницу):".to_string(),
            button_texts(&catalog.document_formats),
        ),
        Step::SouvenirItem => (
            "Что будем печатать?".to_string(),
            button_texts(&catalog.souvenirs),
        ),
        Step::Quantity => {
            let question = match draft.service {
                Service::PhotoPrint => "Сколько фотографий печатаем?",
                Service::DocumentPrint => "Сколько страниц в документе?",
                _ => "Сколько штук?",
            };
            (
                format!("{} (от 1 до {})", question, max_quantity(draft.service)),
                vec![],
            )
        }
        Step::Phone => (
            "Введите ваш номер телефона (для связи и чека):".to_string(),
            vec![],
        ),
        Step::AppointmentTime => (
            "Укажите желаемую дату и время (например: 1 декабря 10:00):".to_string(),
            vec![],
        ),
        Step::Confirm => (confirmation_text(catalog, draft), vec![CONFIRM_BUTTON.to_string()]),
    };

    buttons.push(CANCEL_BUTTON.to_string());
    Prompt { text, buttons }
}

fn button_texts(options: &[PriceOption]) -> Vec<String> {
    options.iter().map(PriceOption::button_text).collect()
}

fn confirmation_text(catalog: &Catalog, draft: &OrderDraft) -> String {
    let mut text = format!("<b>Проверьте заказ</b>\nУслуга: {}\n", draft.service.title());

    if let Some(studio) = &draft.studio {
        let _ = writeln!(
            text,
            "Студия: {} ({})",
            html::escape(&studio.title),
            html::escape(&studio.address)
        );
    }

    let _ = writeln!(text, "{}", html::escape(&draft.details()));
    let _ = write!(text, "Итого: <b>{} ₽</b>", draft.total_price(catalog));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(catalog: &Catalog, service: Service, answers: &[&str]) -> OrderDraft {
        let mut draft = OrderDraft::new(service);
        let mut step = Some(first_step(service));
        for answer in answers {
            let current = step.expect("more answers than steps");
            draft = draft.apply(catalog, current, answer).unwrap();
            step = next_step(service, current);
        }
        assert_eq!(step, None, "flow did not finish");
        draft
    }

    #[test]
    fn every_flow_starts_with_studio_and_ends_with_confirm() {
        for service in Service::ALL {
            let steps = steps_for(service);
            assert_eq!(steps.first(), Some(&Step::Studio));
            assert_eq!(steps.last(), Some(&Step::Confirm));
            assert!(steps.contains(&Step::Phone));
        }
    }

    #[test]
    fn next_step_follows_the_flow() {
        assert_eq!(next_step(Service::DocumentPhoto, Step::Studio), Some(Step::Phone));
        assert_eq!(
            next_step(Service::DocumentPhoto, Step::Phone),
            Some(Step::AppointmentTime)
        );
        assert_eq!(next_step(Service::DocumentPhoto, Step::Confirm), None);
        assert_eq!(next_step(Service::DocumentPhoto, Step::Paper), None);
    }

    #[test]
    fn document_photo_flow_collects_phone_and_time() {
        let catalog = Catalog::default();
        let draft = walk(
            &catalog,
            Service::DocumentPhoto,
            &["A1 на Светланской", "8 914 123 45 67", "1 декабря 10:00", CONFIRM_BUTTON],
        );

        assert_eq!(draft.studio.as_ref().unwrap().key, "svetlanskaya");
        assert_eq!(draft.phone.as_deref(), Some("+79141234567"));
        assert_eq!(draft.appointment.as_deref(), Some("1 декабря 10:00"));
        assert_eq!(draft.total_price(&catalog), 350);
        assert_eq!(draft.expected_uploads(), 0);
        assert_eq!(draft.details(), "Телефон: +79141234567\nВремя: 1 декабря 10:00");
    }

    #[test]
    fn photo_print_flow_prices_by_size_and_count() {
        let catalog = Catalog::default();
        let draft = walk(
            &catalog,
            Service::PhotoPrint,
            &["A1 на Алеутской", "15×21 — 60 ₽", "Матовая", "5", "+7 914 000-00-00", CONFIRM_BUTTON],
        );

        assert_eq!(draft.paper, Some(Paper::Matte));
        assert_eq!(draft.total_price(&catalog), 300);
        assert_eq!(draft.expected_uploads(), 5);
        assert_eq!(
            draft.details(),
            "Формат: 15×21\nБумага: Матовая\nФотографий: 5\nТелефон: +79140000000"
        );
    }

    #[test]
    fn document_print_and_souvenir_expect_one_upload() {
        let catalog = Catalog::default();
        let print = walk(
            &catalog,
            Service::DocumentPrint,
            &["A1 на Алеутской", "A4 цвет — 30 ₽", "12", "9140000000", CONFIRM_BUTTON],
        );
        assert_eq!(print.total_price(&catalog), 360);
        assert_eq!(print.expected_uploads(), 1);

        let souvenir = walk(
            &catalog,
            Service::Souvenir,
            &["A1 на Алеутской", "Кружка — 600 ₽", "2", "9140000000", CONFIRM_BUTTON],
        );
        assert_eq!(souvenir.total_price(&catalog), 1200);
        assert_eq!(souvenir.expected_uploads(), 1);
    }

    #[test]
    fn invalid_answers_keep_the_draft() {
        let catalog = Catalog::default();
        let draft = OrderDraft::new(Service::PhotoPrint);

        assert_eq!(
            draft.apply(&catalog, Step::Studio, "Другая студия"),
            Err(InvalidAnswer::UnknownStudio)
        );
        assert_eq!(
            draft.apply(&catalog, Step::PrintSize, "10×15"),
            Err(InvalidAnswer::UnknownOption)
        );
        assert_eq!(
            draft.apply(&catalog, Step::Paper, "шелковая"),
            Err(InvalidAnswer::UnknownPaper)
        );
        assert_eq!(
            draft.apply(&catalog, Step::Quantity, "0"),
            Err(InvalidAnswer::BadQuantity { max: 100 })
        );
        assert_eq!(
            draft.apply(&catalog, Step::Quantity, "101"),
            Err(InvalidAnswer::BadQuantity { max: 100 })
        );
        assert_eq!(
            draft.apply(&catalog, Step::Quantity, "пять"),
            Err(InvalidAnswer::BadQuantity { max: 100 })
        );
        assert_eq!(draft.apply(&catalog, Step::Phone, "123"), Err(InvalidAnswer::BadPhone));
        assert_eq!(
            draft.apply(&catalog, Step::AppointmentTime, "  "),
            Err(InvalidAnswer::BadAppointment)
        );
        assert_eq!(
            draft.apply(&catalog, Step::Confirm, "да"),
            Err(InvalidAnswer::NotConfirmed)
        );
    }

    #[test]
    fn quantity_limits_are_inclusive() {
        let catalog = Catalog::default();
        for (service, max) in [
            (Service::PhotoPrint, "100"),
            (Service::DocumentPrint, "500"),
            (Service::Souvenir, "50"),
        ] {
            let draft = OrderDraft::new(service).apply(&catalog, Step::Quantity, max).unwrap();
            assert_eq!(draft.quantity, Some(max_quantity(service)));

            assert_eq!(
                OrderDraft::new(service).apply(&catalog, Step::Quantity, "1").unwrap().quantity,
                Some(1)
            );
        }

        assert_eq!(
            OrderDraft::new(Service::DocumentPrint).apply(&catalog, Step::Quantity, "501"),
            Err(InvalidAnswer::BadQuantity { max: 500 })
        );
        assert_eq!(
            OrderDraft::new(Service::Souvenir).apply(&catalog, Step::Quantity, "51"),
            Err(InvalidAnswer::BadQuantity { max: 50 })
        );
    }

    #[test]
    fn appointment_length_limits_are_inclusive() {
        let catalog = Catalog::default();
        let draft = OrderDraft::new(Service::DocumentPhoto);

        let shortest = draft.apply(&catalog, Step::AppointmentTime, "в 9").unwrap();
        assert_eq!(shortest.appointment.as_deref(), Some("в 9"));

        let longest = "ч".repeat(100);
        let accepted = draft.apply(&catalog, Step::AppointmentTime, &longest).unwrap();
        assert_eq!(accepted.appointment, Some(longest));

        assert_eq!(
            draft.apply(&catalog, Step::AppointmentTime, &"ч".repeat(101)),
            Err(InvalidAnswer::BadAppointment)
        );
        assert_eq!(
            draft.apply(&catalog, Step::AppointmentTime, "  в9  "),
            Err(InvalidAnswer::BadAppointment)
        );
    }

    #[test]
    fn large_totals_do_not_overflow() {
        let mut catalog = Catalog::default();
        catalog.souvenirs = vec![PriceOption {
            label: "Картина".to_string(),
            price: u32::MAX,
        }];

        let mut draft = OrderDraft::new(Service::Souvenir);
        draft.option = Some(catalog.souvenirs[0].clone());
        draft.quantity = Some(max_quantity(Service::Souvenir));

        assert_eq!(draft.total_price(&catalog), u64::from(u32::MAX) * 50);
    }

    #[test]
    fn prompts_always_offer_cancel() {
        let catalog = Catalog::default();
        for service in Service::ALL {
            let draft = OrderDraft::new(service);
            for step in steps_for(service) {
                let prompt = prompt(&catalog, *step, &draft);
                assert_eq!(prompt.buttons.last().map(String::as_str), Some(CANCEL_BUTTON));
                assert!(!prompt.text.is_empty());
            }
        }
    }

    #[test]
    fn studio_prompt_lists_every_studio() {
        let catalog = Catalog::default();
        let prompt = prompt(&catalog, Step::Studio, &OrderDraft::new(Service::Souvenir));
        assert_eq!(
            prompt.buttons,
            vec!["A1 на Светланской", "A1 на Алеутской", CANCEL_BUTTON]
        );
    }

    #[test]
    fn confirmation_escapes_user_text() {
        let catalog = Catalog::default();
        let mut draft = OrderDraft::new(Service::DocumentPhoto);
        draft.appointment = Some("<b>завтра</b>".to_string());

        let prompt = prompt(&catalog, Step::Confirm, &draft);
        assert!(prompt.text.contains("&lt;b&gt;завтра&lt;/b&gt;"));
        assert!(prompt.text.contains("Итого: <b>350 ₽</b>"));
        assert_eq!(prompt.buttons, vec![CONFIRM_BUTTON, CANCEL_BUTTON]);
    }
}
