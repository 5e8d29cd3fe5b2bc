/// Upper-cases the first letter of every alphabetic run and lower-cases the rest,
/// so `"DUBLIN AIRPORT"` becomes `"Dublin Airport"` and `"year-month"` becomes
/// `"Year-Month"`. Any non-letter (digits included) starts a new run.
pub fn title_case(value: &str) -> String {
    let mut titled = String::with_capacity(value.len());
    let mut in_word = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if in_word {
                titled.extend(ch.to_lowercase());
            } else {
                titled.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            titled.push(ch);
            in_word = false;
        }
    }
    titled
}
