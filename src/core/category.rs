//! Spending categories and the two sentinel categories.

/// Category assigned to every non-negative amount; never classified
pub const INCOME_CATEGORY: &str = "Доход";

/// Category used whenever classification is skipped or fails
pub const FALLBACK_CATEGORY: &str = "Прочее";

/// Default ordered list of expense categories offered to the classifier.
#[must_use]
pub fn default_categories() -> Vec<String> {
    [
        "Автомобиль",
        "Еда вне дома",
        "Здоровье",
        "Коммунальные платежи",
        "Одежда и обувь",
        "Образование",
        "Питомцы",
        "Подарки",
        "Продукты",
        "Путешествия",
        "Развлечения",
        "Связь и подписки",
        "Спорт и фитнес",
        "Товары для дома",
        "Транспорт",
        "Уход за собой",
        FALLBACK_CATEGORY,
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
