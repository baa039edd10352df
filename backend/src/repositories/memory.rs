//! In-memory store
//!
//! Holds every table behind one `RwLock`. Writes that must be atomic
//! (goal completion, streak updates) happen inside a single write section.

use super::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

type DailyTable<R> = BTreeMap<(Uuid, NaiveDate), R>;

#[derive(Default)]
struct Tables {
    water: DailyTable<WaterLog>,
    exercise: DailyTable<ExerciseLog>,
    period: DailyTable<PeriodLog>,
    constipation: DailyTable<ConstipationLog>,
    kriya: DailyTable<KriyaLog>,
    typing: DailyTable<TypingLog>,
    study: DailyTable<StudyLog>,
    tasks: HashMap<Uuid, (Uuid, TaskRecord)>,
    subjects: BTreeMap<(Uuid, String), SubjectRecord>,
    goals: Vec<Goal>,
    achievements: Vec<GoalAchievement>,
    streaks: BTreeMap<(Uuid, String), StreakState>,
}

/// Rows of one user within a date range, ascending
fn rows_in<R: Clone>(table: &DailyTable<R>, user_id: Uuid, range: DateRange) -> Vec<R> {
    if range.start > range.end {
        return Vec::new();
    }
    table
        .range((user_id, range.start)..=(user_id, range.end))
        .map(|(_, row)| row.clone())
        .collect()
}

fn points_in<R>(
    table: &DailyTable<R>,
    user_id: Uuid,
    range: DateRange,
    value: impl Fn(&R) -> f64,
) -> Vec<MetricPoint> {
    if range.start > range.end {
        return Vec::new();
    }
    table
        .range((user_id, range.start)..=(user_id, range.end))
        .map(|((_, date), row)| MetricPoint::new(*date, value(row)))
        .collect()
}

fn flag(set: bool, on: f64) -> f64 {
    if set {
        on
    } else {
        0.0
    }
}

/// Store keeping all data in process memory
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, as a lost database connection would
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            anyhow::bail!("in-memory store is unavailable");
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Upserts keyed by (user, date)
    // ------------------------------------------------------------------------

    pub async fn upsert_water(&self, user_id: Uuid, log: WaterLog) {
        self.tables.write().await.water.insert((user_id, log.date), log);
    }

    pub async fn upsert_exercise(&self, user_id: Uuid, log: ExerciseLog) {
        self.tables.write().await.exercise.insert((user_id, log.date), log);
    }

    pub async fn upsert_period(&self, user_id: Uuid, log: PeriodLog) {
        self.tables.write().await.period.insert((user_id, log.date), log);
    }

    pub async fn upsert_constipation(&self, user_id: Uuid, log: ConstipationLog) {
        self.tables
            .write()
            .await
            .constipation
            .insert((user_id, log.date), log);
    }

    pub async fn upsert_kriya(&self, user_id: Uuid, log: KriyaLog) {
        self.tables.write().await.kriya.insert((user_id, log.date), log);
    }

    pub async fn upsert_typing(&self, user_id: Uuid, log: TypingLog) {
        self.tables.write().await.typing.insert((user_id, log.date), log);
    }

    pub async fn upsert_study(&self, user_id: Uuid, log: StudyLog) {
        self.tables.write().await.study.insert((user_id, log.date), log);
    }

    /// Insert or replace a task by id
    pub async fn upsert_task(&self, user_id: Uuid, task: TaskRecord) {
        self.tables.write().await.tasks.insert(task.id, (user_id, task));
    }

    /// Insert or replace a subject by code
    pub async fn upsert_subject(&self, user_id: Uuid, subject: SubjectRecord) {
        self.tables
            .write()
            .await
            .subjects
            .insert((user_id, subject.code.clone()), subject);
    }

    /// Insert a fully formed goal, keeping its timestamps
    pub async fn insert_goal(&self, goal: Goal) {
        self.tables.write().await.goals.push(goal);
    }
}

#[async_trait]
impl MetricStore for InMemoryStore {
    async fn water_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<WaterLog>> {
        self.ensure_available()?;
        Ok(rows_in(&self.tables.read().await.water, user_id, range))
    }

    async fn exercise_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<ExerciseLog>> {
        self.ensure_available()?;
        Ok(rows_in(&self.tables.read().await.exercise, user_id, range))
    }

    async fn period_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<PeriodLog>> {
        self.ensure_available()?;
        Ok(rows_in(&self.tables.read().await.period, user_id, range))
    }

    async fn constipation_logs(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<ConstipationLog>> {
        self.ensure_available()?;
        Ok(rows_in(&self.tables.read().await.constipation, user_id, range))
    }

    async fn kriya_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<KriyaLog>> {
        self.ensure_available()?;
        Ok(rows_in(&self.tables.read().await.kriya, user_id, range))
    }

    async fn typing_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<TypingLog>> {
        self.ensure_available()?;
        Ok(rows_in(&self.tables.read().await.typing, user_id, range))
    }

    async fn study_logs(&self, user_id: Uuid, range: DateRange) -> Result<Vec<StudyLog>> {
        self.ensure_available()?;
        Ok(rows_in(&self.tables.read().await.study, user_id, range))
    }

    async fn tasks(&self, user_id: Uuid, range: DateRange) -> Result<Vec<TaskRecord>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        let mut tasks: Vec<TaskRecord> = tables
            .tasks
            .values()
            .filter(|(owner, task)| *owner == user_id && range.contains(task.due_date))
            .map(|(_, task)| task.clone())
            .collect();
        tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn subjects(&self, user_id: Uuid) -> Result<Vec<SubjectRecord>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .subjects
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .map(|(_, subject)| subject.clone())
            .collect())
    }

    async fn daily_values(
        &self,
        user_id: Uuid,
        source: MetricSource,
        range: DateRange,
    ) -> Result<Vec<MetricPoint>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        let points = match source {
            MetricSource::Water => {
                points_in(&tables.water, user_id, range, |r| f64::from(r.amount_ml))
            }
            MetricSource::ExerciseSteps => {
                points_in(&tables.exercise, user_id, range, |r| f64::from(r.steps))
            }
            MetricSource::StudyHours => points_in(&tables.study, user_id, range, |r| r.hours),
            MetricSource::KriyaSessions => {
                points_in(&tables.kriya, user_id, range, |r| flag(r.completed, 1.0))
            }
            MetricSource::TypingCompletion => {
                points_in(&tables.typing, user_id, range, |r| flag(r.completed, 100.0))
            }
            MetricSource::ConstipationPositive => points_in(&tables.constipation, user_id, range, |r| {
                flag(r.had_bowel_movement, 100.0)
            }),
            MetricSource::TaskCompletion => {
                let mut by_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
                for (owner, task) in tables.tasks.values() {
                    if *owner == user_id && range.contains(task.due_date) {
                        let entry = by_day.entry(task.due_date).or_default();
                        entry.0 += 1;
                        entry.1 += usize::from(task.completed);
                    }
                }
                by_day
                    .into_iter()
                    .map(|(date, (total, completed))| {
                        MetricPoint::new(date, 100.0 * completed as f64 / total as f64)
                    })
                    .collect()
            }
        };
        Ok(points)
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_available()
    }
}

#[async_trait]
impl GoalStore for InMemoryStore {
    async fn goals(&self, user_id: Uuid, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        let mut goals: Vec<Goal> = tables
            .goals
            .iter()
            .filter(|g| g.user_id == user_id && status.map_or(true, |s| g.status == s))
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    async fn goal(&self, user_id: Uuid, goal_id: Uuid) -> Result<Option<Goal>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .goals
            .iter()
            .find(|g| g.id == goal_id && g.user_id == user_id)
            .cloned())
    }

    async fn latest_goal(
        &self,
        user_id: Uuid,
        metric: MetricKey,
        goal_type: Option<GoalType>,
        status: Option<GoalStatus>,
    ) -> Result<Option<Goal>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .goals
            .iter()
            .filter(|g| {
                g.user_id == user_id
                    && g.metric == metric
                    && goal_type.map_or(true, |t| g.goal_type == t)
                    && status.map_or(true, |s| g.status == s)
            })
            .max_by_key(|g| g.created_at)
            .cloned())
    }

    async fn create_goal(&self, input: NewGoal) -> Result<Goal> {
        self.ensure_available()?;
        let now = Utc::now();
        let goal = Goal {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            goal_type: input.goal_type,
            metric: input.metric,
            target: input.target,
            description: input.description,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.goals.push(goal.clone());
        Ok(goal)
    }

    async fn set_goal_status(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        from: GoalStatus,
        to: GoalStatus,
    ) -> Result<Option<Goal>> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        let Some(goal) = tables
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id && g.user_id == user_id && g.status == from)
        else {
            return Ok(None);
        };
        goal.status = to;
        goal.updated_at = Utc::now();
        Ok(Some(goal.clone()))
    }

    async fn complete_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        achieved_value: f64,
    ) -> Result<Option<GoalAchievement>> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let Some(goal) = tables.goals.iter_mut().find(|g| {
            g.id == goal_id && g.user_id == user_id && g.status == GoalStatus::Active
        }) else {
            return Ok(None);
        };
        goal.status = GoalStatus::Completed;
        goal.updated_at = now;

        let achievement = GoalAchievement {
            id: Uuid::new_v4(),
            user_id,
            goal_id,
            achieved_value,
            achieved_at: now,
        };
        tables.achievements.push(achievement.clone());
        Ok(Some(achievement))
    }

    async fn achievements(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<GoalAchievement>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        let mut achievements: Vec<GoalAchievement> = tables
            .achievements
            .iter()
            .filter(|a| a.user_id == user_id && since.map_or(true, |s| a.achieved_at >= s))
            .cloned()
            .collect();
        achievements.sort_by(|a, b| b.achieved_at.cmp(&a.achieved_at));
        Ok(achievements)
    }
}

#[async_trait]
impl StreakStore for InMemoryStore {
    async fn record_activity(
        &self,
        user_id: Uuid,
        activity_type: &str,
        date: NaiveDate,
    ) -> Result<StreakState> {
        self.ensure_available()?;
        let mut tables = self.tables.write().await;
        let streak = tables
            .streaks
            .entry((user_id, activity_type.to_string()))
            .or_insert_with(|| StreakState::new(user_id, activity_type));
        streak.advance(date);
        Ok(streak.clone())
    }

    async fn streaks(&self, user_id: Uuid) -> Result<Vec<StreakState>> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(tables
            .streaks
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .map(|(_, streak)| streak.clone())
            .collect())
    }
}
