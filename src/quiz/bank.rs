// src/quiz/bank.rs

use crate::models::question::Question;

/// Number of options every question in the bank carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

fn question(
    id: i64,
    text: &str,
    options: [&str; OPTIONS_PER_QUESTION],
    correct: usize,
) -> Question {
    Question {
        id,
        question_text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_option_index: correct,
    }
}

/// The entrance quiz. Each call returns a fresh copy, so shuffling never
/// touches the canonical order.
pub fn default_bank() -> Vec<Question> {
    vec![
        question(
            1,
            "Dasturlash tilida 'variable' nima?",
            [
                "Ma'lumotlarni saqlash uchun joy",
                "Dastur kodi",
                "Kompyuter xotirasi",
                "Internet aloqasi",
            ],
            0,
        ),
        question(
            2,
            "HTML nima uchun ishlatiladi?",
            [
                "Ma'lumotlar bazasi yaratish",
                "Web sahifa tuzilishini yaratish",
                "Rasm tahrirlash",
                "Video montaj",
            ],
            1,
        ),
        question(
            3,
            "CSS ning asosiy vazifasi nima?",
            [
                "Ma'lumotlarni saqlash",
                "Dastur logikasini yozish",
                "Web sahifa dizaynini yaratish",
                "Ma'lumotlar bazasini boshqarish",
            ],
            2,
        ),
        question(
            4,
            "JavaScript qaysi turdagi dasturlash tili?",
            [
                "Faqat server tomonida ishlaydigan",
                "Faqat mobil ilovalar uchun",
                "Web brauzer va serverda ishlaydigan",
                "Faqat o'yinlar uchun",
            ],
            2,
        ),
        question(
            5,
            "Ma'lumotlar bazasida 'table' nima?",
            [
                "Kompyuter stoli",
                "Ma'lumotlarni jadval ko'rinishida saqlash",
                "Dastur fayli",
                "Internet sahifa",
            ],
            1,
        ),
        question(
            6,
            "Algorithm nima?",
            [
                "Kompyuter dasturi",
                "Masalani yechish uchun qadamlar ketma-ketligi",
                "Dasturlash tili",
                "Internet protokoli",
            ],
            1,
        ),
        question(
            7,
            "Frontend va Backend o'rtasidagi farq nima?",
            [
                "Frontend - foydalanuvchi ko'radigan qism, Backend - server qismi",
                "Ikkalasi ham bir xil",
                "Frontend - server, Backend - mijoz",
                "Farq yo'q",
            ],
            0,
        ),
        question(
            8,
            "API nima?",
            [
                "Dasturlash tili",
                "Kompyuter qurilmasi",
                "Dasturlar o'rtasida ma'lumot almashish usuli",
                "Internet brauzeri",
            ],
            2,
        ),
        question(
            9,
            "Git nima uchun ishlatiladi?",
            [
                "Rasm tahrirlash",
                "Kod versiyalarini boshqarish",
                "Video montaj",
                "Musiqa tinglash",
            ],
            1,
        ),
        question(
            10,
            "Responsive design nima?",
            [
                "Tez ishlaydigan dastur",
                "Turli qurilmalarga moslashadigan dizayn",
                "Rang sxemasi",
                "Shrift turi",
            ],
            1,
        ),
    ]
}

/// Checks the structural invariants the shuffle relies on: unique ids,
/// exactly four options, and a correct index inside the option list.
pub fn validate_bank(bank: &[Question]) -> Result<(), String> {
    if bank.is_empty() {
        return Err("question bank is empty".to_string());
    }

    let mut seen = std::collections::HashSet::new();
    for q in bank {
        if !seen.insert(q.id) {
            return Err(format!("duplicate question id {}", q.id));
        }
        if q.options.len() != OPTIONS_PER_QUESTION {
            return Err(format!(
                "question {} has {} options, expected {}",
                q.id,
                q.options.len(),
                OPTIONS_PER_QUESTION
            ));
        }
        if q.correct_option().is_none() {
            return Err(format!(
                "question {} has out-of-range correct index {}",
                q.id, q.correct_option_index
            ));
        }
    }
    Ok(())
}
