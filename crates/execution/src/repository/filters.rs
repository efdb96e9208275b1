use super::RecordFilter;
use lpm_domain::{
    InactiveReason, Order, OrderDirection, Percent, Pool, Position, PositionId, PositionStatus,
    Project, ProjectId, ProjectStatus, Reward, Token, Wallet,
};

fn admits<T: PartialEq>(allowed: &[T], value: &T) -> bool {
    allowed.is_empty() || allowed.contains(value)
}

/// Selects projects. Each non-empty list must contain the matching value.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Project ids.
    pub ids: Vec<ProjectId>,
    /// Wallet addresses.
    pub wallets: Vec<String>,
    /// Pool addresses.
    pub pools: Vec<String>,
    /// Project statuses.
    pub statuses: Vec<ProjectStatus>,
    /// Deactivation reasons; only inactive projects match.
    pub reasons: Vec<InactiveReason>,
}

impl ProjectFilter {
    /// The project with `id`.
    pub fn by_id(id: ProjectId) -> Self {
        Self {
            ids: vec![id],
            ..Default::default()
        }
    }

    /// All active projects.
    pub fn active() -> Self {
        Self {
            statuses: vec![ProjectStatus::Active],
            ..Default::default()
        }
    }
}

impl RecordFilter<Project> for ProjectFilter {
    fn matches(&self, p: &Project) -> bool {
        admits(&self.ids, &p.id)
            && admits(&self.wallets, &p.wallet.address)
            && admits(&self.pools, &p.pool.address)
            && admits(&self.statuses, &p.status())
            && (self.reasons.is_empty()
                || p.inactive_reason().is_some_and(|r| self.reasons.contains(&r)))
    }
}

/// Selects positions. Each non-empty list must contain the matching value.
#[derive(Debug, Clone, Default)]
pub struct PositionFilter {
    /// Position ids.
    pub ids: Vec<PositionId>,
    /// Owning projects.
    pub projects: Vec<ProjectId>,
    /// Pool addresses.
    pub pools: Vec<String>,
    /// Position addresses.
    pub addresses: Vec<String>,
    /// Position statuses.
    pub statuses: Vec<PositionStatus>,
}

impl PositionFilter {
    /// Open positions of `project`.
    pub fn open_for(project: ProjectId) -> Self {
        Self {
            projects: vec![project],
            statuses: vec![PositionStatus::Open],
            ..Default::default()
        }
    }
}

impl RecordFilter<Position> for PositionFilter {
    fn matches(&self, p: &Position) -> bool {
        admits(&self.ids, &p.id)
            && admits(&self.projects, &p.project_id)
            && admits(&self.pools, &p.pool.address)
            && admits(&self.addresses, &p.address)
            && admits(&self.statuses, &p.status())
    }
}

/// Selects orders. Each non-empty list must contain the matching value.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Owning projects.
    pub projects: Vec<ProjectId>,
    /// Pool addresses.
    pub pools: Vec<String>,
    /// Order addresses.
    pub addresses: Vec<String>,
    /// Swap directions.
    pub directions: Vec<OrderDirection>,
    /// Tokens paid.
    pub tokens_in: Vec<Token>,
    /// Tokens received.
    pub tokens_out: Vec<Token>,
}

impl OrderFilter {
    /// Orders of `project`.
    pub fn for_project(project: ProjectId) -> Self {
        Self {
            projects: vec![project],
            ..Default::default()
        }
    }
}

impl RecordFilter<Order> for OrderFilter {
    fn matches(&self, o: &Order) -> bool {
        admits(&self.projects, &o.project_id)
            && admits(&self.pools, &o.pool.address)
            && admits(&self.addresses, &o.address)
            && admits(&self.directions, &o.direction)
            && admits(&self.tokens_in, o.amount_in.token().as_ref())
            && admits(&self.tokens_out, o.amount_out.token().as_ref())
    }
}

/// Selects rewards. Each non-empty list must contain the matching value.
#[derive(Debug, Clone, Default)]
pub struct RewardFilter {
    /// Positions the rewards came from.
    pub positions: Vec<PositionId>,
    /// Reward tokens.
    pub tokens: Vec<Token>,
}

impl RewardFilter {
    /// Rewards of `position`.
    pub fn for_position(position: PositionId) -> Self {
        Self {
            positions: vec![position],
            ..Default::default()
        }
    }
}

impl RecordFilter<Reward> for RewardFilter {
    fn matches(&self, r: &Reward) -> bool {
        admits(&self.positions, &r.position_id) && admits(&self.tokens, r.amount.token().as_ref())
    }
}

/// Selects pools. Each non-empty list must contain the matching value.
#[derive(Debug, Clone, Default)]
pub struct PoolFilter {
    /// Networks.
    pub networks: Vec<String>,
    /// Protocols.
    pub protocols: Vec<String>,
    /// Pool addresses.
    pub addresses: Vec<String>,
    /// Base tokens.
    pub base_tokens: Vec<Token>,
    /// Quote tokens.
    pub quote_tokens: Vec<Token>,
    /// Fee tiers.
    pub fees: Vec<Percent>,
}

impl RecordFilter<Pool> for PoolFilter {
    fn matches(&self, p: &Pool) -> bool {
        admits(&self.networks, &p.network)
            && admits(&self.protocols, &p.protocol)
            && admits(&self.addresses, &p.address)
            && admits(&self.base_tokens, p.pair.base.as_ref())
            && admits(&self.quote_tokens, p.pair.quote.as_ref())
            && admits(&self.fees, &p.fee)
    }
}

/// Selects tokens. Each non-empty list must contain the matching value.
#[derive(Debug, Clone, Default)]
pub struct TokenFilter {
    /// Networks.
    pub networks: Vec<String>,
    /// Token addresses.
    pub addresses: Vec<String>,
    /// Tickers.
    pub tickers: Vec<String>,
}

impl RecordFilter<Token> for TokenFilter {
    fn matches(&self, t: &Token) -> bool {
        admits(&self.networks, &t.network)
            && admits(&self.addresses, &t.address)
            && admits(&self.tickers, &t.ticker)
    }
}

/// Selects wallets. Each non-empty list must contain the matching value.
#[derive(Debug, Clone, Default)]
pub struct WalletFilter {
    /// Networks.
    pub networks: Vec<String>,
    /// Wallet addresses.
    pub addresses: Vec<String>,
}

impl RecordFilter<Wallet> for WalletFilter {
    fn matches(&self, w: &Wallet) -> bool {
        admits(&self.networks, &w.network) && admits(&self.addresses, &w.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpm_domain::{Amount, Pair, Price};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn project() -> Project {
        let weth = Arc::new(Token::new("ethereum", "0xc02a", "WETH", 18));
        let usdc = Arc::new(Token::new("ethereum", "0xa0b8", "USDC", 6));
        let eth = Arc::new(Token::new("ethereum", "0xeeee", "ETH", 18));
        let pool = Pool::new(
            "ethereum",
            "uniswap-v3",
            "0x88e6",
            Pool::LOW_FEE,
            Pair::new(weth, usdc.clone()),
            Price::new(dec!(2000)),
        );
        Project::new(
            Wallet::new("main", "ethereum", "0xabc", "key", eth),
            pool,
            "p",
            Amount::new(usdc, 1_000u64),
            Percent::ZERO,
            Percent::ZERO,
            Percent::ZERO,
            Percent::ZERO,
            1,
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(ProjectFilter::default().matches(&project()));
        assert!(ProjectFilter::active().matches(&project()));
    }

    #[test]
    fn test_project_filter_attributes() {
        let mut p = project();
        assert!(ProjectFilter::by_id(p.id).matches(&p));
        assert!(!ProjectFilter::by_id(ProjectId::new()).matches(&p));

        let by_reason = ProjectFilter {
            reasons: vec![InactiveReason::StopLoss],
            ..Default::default()
        };
        assert!(!by_reason.matches(&p));
        p.deactivate(InactiveReason::StopLoss);
        assert!(by_reason.matches(&p));
        assert!(!ProjectFilter::active().matches(&p));
    }

    #[test]
    fn test_pool_filter_uses_token_identity() {
        let p = project();
        let filter = PoolFilter {
            base_tokens: vec![Token::new("ethereum", "0xc02a", "weth", 18)],
            fees: vec![Pool::LOW_FEE],
            ..Default::default()
        };
        assert!(filter.matches(&p.pool));

        let other_fee = PoolFilter {
            fees: vec![Pool::HIGH_FEE],
            ..Default::default()
        };
        assert!(!other_fee.matches(&p.pool));
    }
}
