/// Format a float as an amount with thousands separators: 1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// Format a piece count as cartons + loose pieces: "3 ctn + 10 pcs".
/// Pack sizes of 1 or less fall back to pieces only.
pub fn cartons(qty_pcs: f64, pcs_in_ctn: f64) -> String {
    let sign = if qty_pcs < 0.0 { "-" } else { "" };
    let abs = qty_pcs.abs();
    if pcs_in_ctn <= 1.0 {
        return format!("{sign}{abs:.0} pcs");
    }
    let per = pcs_in_ctn;
    let ctn = (abs / per).floor();
    let loose = abs - ctn * per;
    if ctn == 0.0 {
        format!("{sign}{abs:.0} pcs")
    } else if loose == 0.0 {
        format!("{sign}{ctn:.0} ctn")
    } else {
        format!("{sign}{ctn:.0} ctn + {loose:.0} pcs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "1,234.56");
        assert_eq!(money(-500.00), "-500.00");
        assert_eq!(money(0.0), "0.00");
        assert_eq!(money(1000000.99), "1,000,000.99");
        assert_eq!(money(42.10), "42.10");
    }

    #[test]
    fn test_cartons_formatting() {
        assert_eq!(cartons(50.0, 12.0), "4 ctn + 2 pcs");
        assert_eq!(cartons(24.0, 12.0), "2 ctn");
        assert_eq!(cartons(7.0, 12.0), "7 pcs");
        assert_eq!(cartons(-30.0, 12.0), "-2 ctn + 6 pcs");
    }

    #[test]
    fn test_cartons_defaults_to_pieces_when_no_pack_size() {
        assert_eq!(cartons(5.0, 0.0), "5 pcs");
        assert_eq!(cartons(5.0, 1.0), "5 pcs");
    }
}
