//! RFM segmentation and churn-risk scoring
//!
//! Every customer with at least one non-cancelled order gets recency,
//! frequency and monetary quintile scores (1–5, 5 best) relative to the other
//! buyers, a segment from a fixed rule ladder, and a churn score comparing the
//! current silence against the customer's own purchase rhythm.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::Order;
use shared::util;

use crate::config::ChurnConfig;
use crate::money::{self, round2, to_f64};
use crate::stats::quintile_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Champions,
    Loyal,
    Potential,
    AtRisk,
    Lost,
    Other,
}

impl Segment {
    pub const ALL: [Segment; 6] = [
        Segment::Champions,
        Segment::Loyal,
        Segment::Potential,
        Segment::AtRisk,
        Segment::Lost,
        Segment::Other,
    ];

    /// First matching rule wins
    pub fn classify(recency: u8, frequency: u8, monetary: u8) -> Self {
        if recency >= 4 && frequency >= 4 && monetary >= 4 {
            Self::Champions
        } else if frequency >= 4 && monetary >= 3 {
            Self::Loyal
        } else if recency >= 4 && frequency <= 2 {
            Self::Potential
        } else if recency <= 2 && frequency >= 3 {
            Self::AtRisk
        } else if recency <= 1 && frequency <= 2 {
            Self::Lost
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    LoyaltyReward,
    VipWinbackCall,
    UpsellPremium,
    PersonalCheckin,
    NurtureSecondPurchase,
    ReactivationOffer,
    UrgentReorderOutreach,
    WinbackDiscount,
    Newsletter,
}

impl RecommendedAction {
    pub fn for_customer(segment: Segment, high_risk: bool) -> Self {
        match (segment, high_risk) {
            (Segment::Champions, false) => Self::LoyaltyReward,
            (Segment::Champions, true) => Self::VipWinbackCall,
            (Segment::Loyal, false) => Self::UpsellPremium,
            (Segment::Loyal, true) => Self::PersonalCheckin,
            (Segment::Potential, false) => Self::NurtureSecondPurchase,
            (Segment::Potential, true) => Self::ReactivationOffer,
            (Segment::AtRisk, _) => Self::UrgentReorderOutreach,
            (Segment::Lost, true) => Self::WinbackDiscount,
            (Segment::Lost, false) => Self::ReactivationOffer,
            (Segment::Other, false) => Self::Newsletter,
            (Segment::Other, true) => Self::ReactivationOffer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSegmentRecord {
    pub user_id: i64,
    pub recency_days: i64,
    pub frequency: usize,
    pub monetary: f64,
    pub recency_score: u8,
    pub frequency_score: u8,
    pub monetary_score: u8,
    pub segment: Segment,
    pub churn_risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub segment: Segment,
    pub customers: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    /// Sorted by user id
    pub customers: Vec<CustomerSegmentRecord>,
    /// One entry per segment, zeros included
    pub summary: Vec<SegmentSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnRiskCustomer {
    pub user_id: i64,
    pub last_order_date: NaiveDate,
    pub days_since_last_order: i64,
    /// Average days between orders, absent for single-order customers
    pub avg_gap_days: Option<f64>,
    /// Silence after which the customer counts as high risk
    pub reference_days: f64,
    pub churn_risk_score: f64,
    pub risk_level: RiskLevel,
    pub segment: Segment,
    pub lifetime_value: f64,
    pub recommended_action: RecommendedAction,
}

/// Purchase history of one customer
struct Profile {
    user_id: i64,
    first_date: NaiveDate,
    last_date: NaiveDate,
    orders: usize,
    spend: Decimal,
    recency_days: i64,
}

impl Profile {
    fn avg_gap_days(&self) -> Option<f64> {
        if self.orders < 2 {
            return None;
        }
        let span = (self.last_date - self.first_date).num_days() as f64;
        Some(span / (self.orders - 1) as f64)
    }
}

struct Churn {
    reference_days: f64,
    score: f64,
    high: bool,
    level: RiskLevel,
}

fn churn(profile: &Profile, config: &ChurnConfig) -> Churn {
    let reference_days = match profile.avg_gap_days() {
        Some(gap) if profile.orders >= config.min_orders_for_gap && gap >= 1.0 => {
            config.gap_multiplier * gap
        }
        _ => config.global_threshold_days,
    };
    let d = profile.recency_days as f64;
    let score = money::ratio(d, d + reference_days);
    let high = d > reference_days;
    let level = if high {
        RiskLevel::High
    } else if score >= config.medium_threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    Churn {
        reference_days,
        score,
        high,
        level,
    }
}

struct Scored {
    profile: Profile,
    recency: u8,
    frequency: u8,
    monetary: u8,
    segment: Segment,
}

/// Buyer profiles sorted by user id
fn profiles(orders: &[Order], today: NaiveDate, tz: Tz) -> Vec<Profile> {
    let mut by_user: BTreeMap<i64, Profile> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.is_revenue()) {
        let date = util::local_date(order.created_at, tz);
        if date > today {
            continue;
        }
        let profile = by_user.entry(order.user_id).or_insert(Profile {
            user_id: order.user_id,
            first_date: date,
            last_date: date,
            orders: 0,
            spend: Decimal::ZERO,
            recency_days: 0,
        });
        profile.first_date = profile.first_date.min(date);
        profile.last_date = profile.last_date.max(date);
        profile.orders += 1;
        profile.spend += order.total;
    }
    by_user
        .into_values()
        .map(|mut p| {
            p.recency_days = (today - p.last_date).num_days();
            p
        })
        .collect()
}

fn score(profiles: Vec<Profile>) -> Vec<Scored> {
    let n = profiles.len();
    let recencies: Vec<i64> = profiles.iter().map(|p| p.recency_days).collect();
    let frequencies: Vec<usize> = profiles.iter().map(|p| p.orders).collect();
    let spends: Vec<Decimal> = profiles.iter().map(|p| p.spend).collect();

    profiles
        .into_iter()
        .map(|profile| {
            let recency = quintile_score(
                recencies.iter().filter(|r| **r >= profile.recency_days).count(),
                n,
            );
            let frequency = quintile_score(
                frequencies.iter().filter(|f| **f <= profile.orders).count(),
                n,
            );
            let monetary =
                quintile_score(spends.iter().filter(|s| **s <= profile.spend).count(), n);
            Scored {
                segment: Segment::classify(recency, frequency, monetary),
                profile,
                recency,
                frequency,
                monetary,
            }
        })
        .collect()
}

fn scored_customers(orders: &[Order], now: DateTime<Utc>, tz: Tz) -> Vec<Scored> {
    let today = util::local_date(now, tz);
    score(profiles(orders, today, tz))
}

/// `orders` is the full purchase history up to `now`
pub fn customer_segments(
    orders: &[Order],
    now: DateTime<Utc>,
    tz: Tz,
    config: &ChurnConfig,
) -> SegmentReport {
    let scored = scored_customers(orders, now, tz);

    let mut summary: BTreeMap<Segment, (usize, Decimal)> =
        Segment::ALL.iter().map(|s| (*s, (0, Decimal::ZERO))).collect();
    for customer in &scored {
        let entry = summary.entry(customer.segment).or_default();
        entry.0 += 1;
        entry.1 += customer.profile.spend;
    }

    let customers: Vec<CustomerSegmentRecord> = scored
        .iter()
        .map(|c| CustomerSegmentRecord {
            user_id: c.profile.user_id,
            recency_days: c.profile.recency_days,
            frequency: c.profile.orders,
            monetary: to_f64(c.profile.spend),
            recency_score: c.recency,
            frequency_score: c.frequency,
            monetary_score: c.monetary,
            segment: c.segment,
            churn_risk_score: round2(churn(&c.profile, config).score),
        })
        .collect();

    tracing::debug!(customers = customers.len(), "Computed customer segments");

    SegmentReport {
        customers,
        summary: summary
            .into_iter()
            .map(|(segment, (customers, revenue))| SegmentSummary {
                segment,
                customers,
                revenue: to_f64(revenue),
            })
            .collect(),
    }
}

/// Churn assessment of every buyer, riskiest first (ties by user id)
pub fn churn_risk(
    orders: &[Order],
    now: DateTime<Utc>,
    tz: Tz,
    config: &ChurnConfig,
) -> Vec<ChurnRiskCustomer> {
    let mut rows: Vec<(f64, ChurnRiskCustomer)> = scored_customers(orders, now, tz)
        .into_iter()
        .map(|c| {
            let churn = churn(&c.profile, config);
            let row = ChurnRiskCustomer {
                user_id: c.profile.user_id,
                last_order_date: c.profile.last_date,
                days_since_last_order: c.profile.recency_days,
                avg_gap_days: c.profile.avg_gap_days().map(round2),
                reference_days: round2(churn.reference_days),
                churn_risk_score: round2(churn.score),
                risk_level: churn.level,
                segment: c.segment,
                lifetime_value: to_f64(c.profile.spend),
                recommended_action: RecommendedAction::for_customer(c.segment, churn.high),
            };
            (churn.score, row)
        })
        .collect();

    rows.sort_by(|(a_score, a), (b_score, b)| {
        b_score.total_cmp(a_score).then(a.user_id.cmp(&b.user_id))
    });
    rows.into_iter().map(|(_, row)| row).collect()
}
