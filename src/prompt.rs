use crate::persona::Philosopher;
use std::fmt::Write;

/// Builds the counselling prompt: the user's concern, the retrieved
/// passages as a numbered quotation block, and the instruction to answer in
/// the philosopher's voice within `length_budget` characters. Pure template
/// substitution, no side effects.
pub fn build_prompt(
    user_message: &str,
    philosopher: Philosopher,
    passages: &[&str],
    length_budget: u32,
) -> String {
    let name = philosopher.display_name();

    let mut quoted = String::new();
    for (i, passage) in passages.iter().enumerate() {
        let _ = writeln!(quoted, "    {}. {{{}}}", i + 1, passage);
    }

    format!(
        "상담 내용: {user_message}\n\
         아래에는 {name}이 쓴 저서의 구절이야.\n\
         ({quoted})\n\
         위 상담 내용에 대해, 위 구절과 {name}의 사상을 바탕으로 {length_budget}자 이내로, \
         {name}의 말투를 사용해서 마치 {name}가 말하듯이 친절하게 상담해줘."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic() {
        let passages = ["a", "b", "c"];
        let one = build_prompt("고민", Philosopher::Kant, &passages, 300);
        let two = build_prompt("고민", Philosopher::Kant, &passages, 300);
        assert_eq!(one, two);
    }

    #[test]
    fn embeds_passages_budget_and_philosopher() {
        let passages = ["신은 죽었다", "영원회귀", "힘에의 의지"];
        let prompt = build_prompt("요즘 무기력해요", Philosopher::Nietzsche, &passages, 100);
        for passage in passages {
            assert!(prompt.contains(passage));
        }
        assert!(prompt.contains("100"));
        assert!(prompt.contains("니체"));
        assert!(prompt.contains("요즘 무기력해요"));
    }

    #[test]
    fn numbers_only_the_passages_it_gets() {
        let prompt = build_prompt("질문", Philosopher::LaoTzu, &["하나", "둘"], 100);
        assert!(prompt.contains("1. {하나}"));
        assert!(prompt.contains("2. {둘}"));
        assert!(!prompt.contains("3. {"));
    }
}
