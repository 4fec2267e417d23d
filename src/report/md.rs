use super::ScoreReport;

pub fn to_markdown(report: &ScoreReport) -> String {
    let mut output = String::new();
    match &report.title {
        Some(title) => output.push_str(&format!("# {} ({})\n\n", title, report.film_id)),
        None => output.push_str(&format!("# {}\n\n", report.film_id)),
    }
    output.push_str(&format!(
        "Discoverability: {}/100 (grade {})\n\n{}\n\n",
        report.discoverability, report.grade, report.interpretation
    ));
    if let Some(hype) = report.hype_score {
        output.push_str(&format!("Hype score: {hype:.1}\n\n"));
    }

    output.push_str("## Breakdown\n\n");
    output.push_str("| component | weight | raw | weighted |\n");
    output.push_str("| --- | --- | --- | --- |\n");
    for part in &report.breakdown {
        output.push_str(&format!(
            "| {} | {}% | {:.3} | {:.1} |\n",
            part.name, part.weight_pct, part.raw, part.weighted
        ));
    }
    output.push('\n');

    let rec = &report.release_recommendation;
    output.push_str("## Release Recommendation\n\n");
    output.push_str(&format!(
        "- window: {}\n- platform strategy: {}\n- rationale: {}\n\n",
        rec.window, rec.platform_strategy, rec.rationale
    ));
    output.push_str(&format!("Analyzed at {}\n", report.analyzed_at));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::report;

    #[test]
    fn markdown_report_contains_sections() {
        let rendered = to_markdown(&report());
        assert!(rendered.contains("# FP-AAAA0001"));
        assert!(rendered.contains("Discoverability: 76/100 (grade B)"));
        assert!(rendered.contains("## Breakdown"));
        assert!(rendered.contains("| audience_match | 25% | 0.900 | 22.5 |"));
        assert!(rendered.contains("## Release Recommendation"));
    }
}
