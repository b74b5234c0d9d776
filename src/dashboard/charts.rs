//! Chart generation and rendering for the dashboard.
//!
//! The necessity breakdown is drawn as an ECharts pie chart. The chart is
//! generated as JSON configuration for the ECharts library and rendered with
//! an HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::prelude::ToPrimitive;

use crate::{dashboard::summary::Summary, html::HeadElement};

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for a dashboard chart.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    html!(
        section class="w-full mx-auto mb-8"
        {
            div
                id=(chart.id)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// The script elements that load ECharts and draw `chart`, with dark mode
/// support and responsive resizing.
pub(super) fn chart_scripts(chart: &DashboardChart) -> [HeadElement; 2] {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            const option = {};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#,
        chart.id, chart.options
    );

    [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        HeadElement::ScriptSource(PreEscaped(script)),
    ]
}

/// A pie chart of the amount spent per necessity tag.
///
/// Tags with nothing spent are left out so they do not clutter the legend.
pub(super) fn necessity_chart(summary: &Summary) -> Chart {
    let data = summary
        .tag_breakdown()
        .into_iter()
        .filter(|(_, total, _)| !total.is_zero())
        .map(|(tag, total, _)| (total.to_f64().unwrap_or_default(), tag.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(
            Title::new()
                .text("Spending by necessity")
                .subtext("All transactions"),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Necessity")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// The necessity chart, or `None` if no transaction carries a necessity tag.
pub(super) fn build_necessity_chart(summary: &Summary) -> Option<DashboardChart> {
    let has_tagged_spending = summary
        .tag_breakdown()
        .iter()
        .any(|(_, total, _)| !total.is_zero());

    has_tagged_spending.then(|| DashboardChart {
        id: "necessity-chart",
        options: necessity_chart(summary).to_string(),
    })
}
