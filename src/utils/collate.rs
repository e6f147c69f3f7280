//! 名称排序
//!
//! 课程名与学生名多为西班牙语，按字节比较会把小写和带重音的名字排到 "Z" 之后。
//! 这里先去掉常见拉丁字母的变音符号并转小写再比较，键相同时回退到原文比较以保证稳定。

use std::cmp::Ordering;

/// 去掉变音符号
fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ā' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'É' | 'È' | 'Ê' | 'Ë' | 'Ē' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'Í' | 'Ì' | 'Î' | 'Ï' | 'Ī' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ō' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' | 'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ū' => 'u',
        'ý' | 'ÿ' | 'Ý' => 'y',
        'ç' | 'Ç' => 'c',
        _ => c,
    }
}

/// 排序键：去重音、转小写
///
/// `ñ` 是独立字母，展开为 `n~`，使其落在 `nz` 之后、`o` 之前。
pub fn collation_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for c in value.trim().chars().map(fold_char).flat_map(char::to_lowercase) {
        if c == 'ñ' {
            key.push_str("n~");
        } else {
            key.push(c);
        }
    }
    key
}

/// 按排序键比较两个名称
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_and_case_fold() {
        assert_eq!(collation_key("Álvaro"), "alvaro");
        assert_eq!(collation_key("  JOSÉ Núñez "), "jose nun~ez");
    }

    #[test]
    fn test_spanish_names_sort_alphabetically() {
        let mut names = vec!["Zoe", "Álvaro", "bruno", "Ángela", "Carlos"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["Álvaro", "Ángela", "bruno", "Carlos", "Zoe"]);
    }

    #[test]
    fn test_enie_after_n() {
        assert_eq!(compare_names("Nuñez", "Nuno"), Ordering::Greater);
        assert_eq!(compare_names("Nzuzu", "Ñandú"), Ordering::Less);
        assert_eq!(compare_names("Ñandú", "Oscar"), Ordering::Less);
    }

    #[test]
    fn test_equal_keys_are_stable() {
        assert_eq!(compare_names("ana", "Ana"), Ordering::Greater);
        assert_eq!(compare_names("Ana", "Ana"), Ordering::Equal);
    }
}
