//! Dashboard view model

use super::chart::{ChartKind, ChartPoint, ChartSpec, NEON_AMBER, NEON_CYAN, NEON_MAGENTA};
use super::labels::{label_or_raw, DisplayLabel};
use crate::models::{TicketCategory, TicketStatistics, TicketStatus};
use crate::routing::Route;

/// Clickable count of tickets in one status
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCard {
    pub status: TicketStatus,
    pub label: &'static str,
    pub count: u64,
    pub color: &'static str,
    /// Ticket list filtered to this status
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total: u64,
    pub cards: Vec<StatusCard>,
    pub category_chart: ChartSpec,
    pub trend_chart: ChartSpec,
}

impl DashboardView {
    pub fn from_stats(stats: &TicketStatistics) -> Self {
        let overview = &stats.overview;
        let cards = [
            (TicketStatus::Open, overview.open),
            (TicketStatus::Processing, overview.processing),
            (TicketStatus::Completed, overview.completed),
        ]
        .into_iter()
        .map(|(status, count)| StatusCard {
            status,
            label: status.label(),
            count,
            color: status.color(),
            route: Route::TicketList {
                status: Some(status),
            },
        })
        .collect();

        let category_points = stats
            .by_category
            .iter()
            .map(|(key, count)| ChartPoint::new(label_or_raw::<TicketCategory>(key), *count))
            .collect();
        let category_chart = ChartSpec::new("Tickets by Category", ChartKind::Pie, category_points)
            .with_colors(&[NEON_CYAN, NEON_MAGENTA, NEON_AMBER]);

        let trend_points = stats
            .trend
            .iter()
            .map(|point| ChartPoint::new(point.date.clone(), point.value))
            .collect();
        let trend_chart = ChartSpec::new("New Tickets (30 days)", ChartKind::Line, trend_points)
            .with_colors(&[NEON_CYAN]);

        Self {
            total: overview.total,
            cards,
            category_chart,
            trend_chart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StatusOverview, TrendPoint};
    use chrono::{TimeZone, Utc};

    fn sample_stats() -> TicketStatistics {
        let mut trend = TrendPoint::window(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        if let Some(today) = trend.last_mut() {
            today.value = 4;
        }

        TicketStatistics {
            overview: StatusOverview {
                total: 9,
                open: 4,
                processing: 3,
                completed: 2,
            },
            by_category: [
                ("SYSTEM_FAILURE".to_string(), 5),
                ("TICKET_PROCESS".to_string(), 4),
            ]
            .into_iter()
            .collect(),
            trend,
            ..Default::default()
        }
    }

    #[test]
    fn test_status_cards_link_to_filtered_list() {
        let view = DashboardView::from_stats(&sample_stats());
        assert_eq!(view.total, 9);

        let counts: Vec<u64> = view.cards.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![4, 3, 2]);
        assert_eq!(view.cards[1].route.to_path(), "/tickets?status=PROCESSING");
    }

    #[test]
    fn test_category_chart_uses_labels() {
        let view = DashboardView::from_stats(&sample_stats());
        let chart = &view.category_chart;

        assert_eq!(chart.kind, ChartKind::Pie);
        // BTreeMap order: SYSTEM_FAILURE before TICKET_PROCESS
        assert_eq!(chart.points[0], ChartPoint::new("System Failure", 5));
        assert_eq!(chart.points[1], ChartPoint::new("Ticket Process", 4));
        assert_eq!(chart.color_for(0), NEON_CYAN);
    }

    #[test]
    fn test_trend_chart_keeps_window_order() {
        let view = DashboardView::from_stats(&sample_stats());
        let chart = &view.trend_chart;

        assert_eq!(chart.points.len(), 30);
        assert_eq!(chart.points.last().map(|p| p.label.as_str()), Some("Today"));
        assert_eq!(chart.max_value(), 4);
    }

    #[test]
    fn test_empty_stats() {
        let view = DashboardView::from_stats(&TicketStatistics::default());
        assert!(view.category_chart.is_empty());
        assert!(view.trend_chart.points.is_empty());
        assert!(view.cards.iter().all(|c| c.count == 0));
    }
}
