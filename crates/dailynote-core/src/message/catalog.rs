//! Literal copy, three variants per category and context.
//!
//! Placeholders: `{name}`, `{amount}` (ml), `{task}`.

use super::{MessageCategory, MessageContext};

type Variant = (&'static str, &'static str);

pub(super) const FALLBACK: Variant = ("Reminder", "Hi {name}, a quick reminder.");

pub(super) fn variants(category: MessageCategory, context: MessageContext) -> &'static [Variant] {
    use MessageCategory as C;
    use MessageContext as X;

    match (category, context) {
        (C::WaterReminder, X::Relaxed) => &[
            ("Water time", "Hey {name}, how about {amount} ml of water?"),
            ("Sip break", "A glass of {amount} ml sounds nice right now, {name}."),
            ("Stay fresh", "{name}, your next {amount} ml is ready when you are."),
        ],
        (C::WaterReminder, X::Neutral) => &[
            ("Hydration check", "Time for {amount} ml of water, {name}."),
            ("Drink up", "{amount} ml keeps the focus going. Grab a glass."),
            ("Water reminder", "Scheduled refill: {amount} ml."),
        ],
        (C::WaterReminder, X::Stressed) => &[
            ("Drink now", "{name}, busy or not: {amount} ml. Now."),
            ("Water. Now.", "You are running hot. {amount} ml before the next thing."),
            ("No excuses", "{amount} ml. It takes thirty seconds."),
        ],

        (C::OverdueWater, X::Relaxed) => &[
            ("Missed a sip", "No worries {name}, the {amount} ml is still waiting."),
            ("Still thirsty?", "That {amount} ml slipped by. Catch up whenever."),
            ("Gentle nudge", "You skipped a glass earlier. {amount} ml when you can."),
        ],
        (C::OverdueWater, X::Neutral) => &[
            ("Water overdue", "You missed {amount} ml ten minutes ago, {name}."),
            ("Catch up", "{amount} ml is overdue. Take it now."),
            ("Behind on water", "Your {amount} ml refill is late."),
        ],
        (C::OverdueWater, X::Stressed) => &[
            ("Still not done", "{name}, that {amount} ml is overdue. Stop and drink."),
            ("Overdue", "{amount} ml. You have been putting it off."),
            ("Seriously", "Ten minutes late on {amount} ml. Go."),
        ],

        (C::TaskReminder, X::Relaxed) => &[
            ("Up next", "Whenever you are ready, {name}: {task}."),
            ("Friendly reminder", "{task} is on the list for now."),
            ("Time for it", "How about picking up {task}?"),
        ],
        (C::TaskReminder, X::Neutral) => &[
            ("Task reminder", "It is time for {task}, {name}."),
            ("Scheduled now", "{task} is scheduled for now."),
            ("On deck", "Next up: {task}."),
        ],
        (C::TaskReminder, X::Stressed) => &[
            ("Do it now", "{name}, {task}. Start it now."),
            ("No more delay", "{task} is due. Get it done."),
            ("Now", "{task}. Clock is running."),
        ],

        (C::OverdueTask, X::Relaxed) => &[
            ("Still open", "{task} is still waiting, {name}. No rush."),
            ("Left behind", "{task} slipped a little. Pick it up later?"),
            ("When you can", "{task} is past its time."),
        ],
        (C::OverdueTask, X::Neutral) => &[
            ("Task overdue", "{task} is overdue, {name}."),
            ("Behind schedule", "{task} missed its slot."),
            ("Catch up", "{task} is late. Want to finish it now?"),
        ],
        (C::OverdueTask, X::Stressed) => &[
            ("Overdue", "{name}, {task} is late. Finish it."),
            ("Falling behind", "{task} is overdue. Nothing else until it is done."),
            ("Late", "{task}. Still not done."),
        ],

        (C::WorkStart, X::Relaxed) => &[
            ("Good morning", "Morning {name}! Ease into the day."),
            ("Hello", "A fresh day, {name}. Start with some water."),
            ("New day", "Take it one task at a time today, {name}."),
        ],
        (C::WorkStart, X::Neutral) => &[
            ("Work starts", "Work hours started, {name}. Check your list."),
            ("Let's go", "Time to begin. What is first today?"),
            ("Day started", "Your work day is on. Plan the first hour."),
        ],
        (C::WorkStart, X::Stressed) => &[
            ("Start now", "{name}, the day has started. Get moving."),
            ("Clock is on", "Work time. Your list is long."),
            ("Begin", "No warm-up today. First task, now."),
        ],

        (C::WorkEnd, X::Relaxed) => &[
            ("Day done", "Nice work today, {name}. Time to rest."),
            ("Wrap up", "Work hours are over. Enjoy your evening."),
            ("Log off", "That's a day, {name}. Switch off."),
        ],
        (C::WorkEnd, X::Neutral) => &[
            ("Work ended", "Work hours are over, {name}. Review what is left."),
            ("End of day", "Time to wrap up. Jot down notes for tomorrow."),
            ("Closing time", "Your day is done. Open tasks move to tomorrow."),
        ],
        (C::WorkEnd, X::Stressed) => &[
            ("Stop", "{name}, work hours are over. Stop and rest."),
            ("Enough", "The day is done. Unfinished tasks will carry over."),
            ("Clock out", "Hours are up. Tomorrow exists."),
        ],

        (C::DailyRoutine, X::Relaxed) => &[
            ("Routine", "Your routine: {task}. Enjoy it, {name}."),
            ("Daily habit", "Time for your daily {task}."),
            ("Same time", "{task}, like every day."),
        ],
        (C::DailyRoutine, X::Neutral) => &[
            ("Routine time", "It is time for {task}, {name}."),
            ("Daily routine", "{task} is on your routine now."),
            ("Habit check", "Keep the streak: {task}."),
        ],
        (C::DailyRoutine, X::Stressed) => &[
            ("Routine now", "{name}, {task}. Don't skip it."),
            ("Do it", "{task}. Routine, not optional."),
            ("Keep it", "Busy day, but {task} still happens."),
        ],

        (C::TaskCompletion, X::Relaxed) => &[
            ("Done!", "Lovely, {name}. {task} is done."),
            ("Nice", "{task} checked off. Treat yourself."),
            ("Finished", "One less thing: {task}."),
        ],
        (C::TaskCompletion, X::Neutral) => &[
            ("Task done", "{task} complete. Good work, {name}."),
            ("Checked off", "{task} is done. On to the next."),
            ("Progress", "Finished {task}. Keep going."),
        ],
        (C::TaskCompletion, X::Stressed) => &[
            ("One down", "{task} done. Next."),
            ("Keep moving", "{task} complete, {name}. Don't stop now."),
            ("Done", "{task}. Good. What is next?"),
        ],

        (C::BreakReminder, X::Relaxed) => &[
            ("Break time", "Stretch a little, {name}."),
            ("Pause", "Look away from the screen for a minute."),
            ("Breathe", "A short walk would be nice right now."),
        ],
        (C::BreakReminder, X::Neutral) => &[
            ("Take a break", "You have been at it a while, {name}. Five minutes."),
            ("Break", "Stand up and stretch."),
            ("Rest your eyes", "Short break: eyes off the screen."),
        ],
        (C::BreakReminder, X::Stressed) => &[
            ("Break. Now.", "{name}, you are overloaded. Step away for five minutes."),
            ("Stop for a moment", "Pushing harder won't help. Take a break."),
            ("Pause", "Five minutes off. Then back at it."),
        ],
    }
}
