/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest, so `"admission fee"` becomes `"Admission Fee"` and `"rs.500"`
/// becomes `"Rs.500"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(title_case("admission fee"), "Admission Fee");
        assert_eq!(title_case("SONU"), "Sonu");
    }

    #[test]
    fn letters_after_punctuation_start_a_word() {
        assert_eq!(title_case("rs.500 o'neil"), "Rs.500 O'Neil");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(title_case(""), "");
    }
}
